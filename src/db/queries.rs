// Alertas

pub const CHECK_ALERTA_DUPLICADA: &str = r#"
SELECT id FROM alertas
WHERE tipo = $1
  AND mensaje = $2
  AND estado = 'activa'
  AND fecha >= NOW() - INTERVAL '5 minutes'
LIMIT 1;
"#;

pub const INSERT_ALERTA: &str = r#"
INSERT INTO alertas (tipo, mensaje, severidad, captura_id, trampa_id, fecha, estado)
VALUES ($1, $2, $3, $4, $5, NOW(), 'activa')
RETURNING id;
"#;

pub const SELECT_ALERTAS_POR_FECHA: &str = r#"
SELECT a.id, a.tipo, a.mensaje, a.fecha, a.severidad, a.estado,
       a.captura_id, a.trampa_id, a.fecha_resolucion, a.notas_resolucion,
       c.fecha AS fecha_captura,
       FLOOR(EXTRACT(EPOCH FROM (NOW() - a.fecha)) / 60)::int8 AS minutos_desde_alerta,
       (SELECT SUM(d.cantidad)::int8 FROM detecciones d WHERE d.captura_id = a.captura_id) AS total_insectos
FROM alertas a
LEFT JOIN capturas c ON a.captura_id = c.id
WHERE a.estado = $1
  AND ($2::text IS NULL OR a.severidad = $2)
  AND ($3::timestamp IS NULL OR a.fecha >= $3)
ORDER BY a.fecha DESC
LIMIT $4;
"#;

pub const SELECT_ALERTAS_POR_SEVERIDAD: &str = r#"
SELECT a.id, a.tipo, a.mensaje, a.fecha, a.severidad, a.estado,
       a.captura_id, a.trampa_id, a.fecha_resolucion, a.notas_resolucion,
       c.fecha AS fecha_captura,
       FLOOR(EXTRACT(EPOCH FROM (NOW() - a.fecha)) / 60)::int8 AS minutos_desde_alerta,
       (SELECT SUM(d.cantidad)::int8 FROM detecciones d WHERE d.captura_id = a.captura_id) AS total_insectos
FROM alertas a
LEFT JOIN capturas c ON a.captura_id = c.id
WHERE a.estado = $1
  AND ($2::text IS NULL OR a.severidad = $2)
  AND ($3::timestamp IS NULL OR a.fecha >= $3)
ORDER BY
    CASE a.severidad
        WHEN 'alta' THEN 1
        WHEN 'media' THEN 2
        WHEN 'baja' THEN 3
        ELSE 4
    END,
    a.fecha DESC
LIMIT $4;
"#;

pub const COUNT_ALERTAS: &str = r#"
SELECT COUNT(*) FROM alertas
WHERE estado = $1
  AND ($2::text IS NULL OR severidad = $2)
  AND ($3::timestamp IS NULL OR fecha >= $3);
"#;

pub const STATS_ALERTAS_ACTIVAS: &str = r#"
SELECT severidad, COUNT(*) AS cantidad
FROM alertas
WHERE estado = 'activa'
GROUP BY severidad;
"#;

pub const SELECT_ESTADO_ALERTA: &str = r#"
SELECT estado FROM alertas WHERE id = $1;
"#;

pub const UPDATE_ALERTA_CERRADA: &str = r#"
UPDATE alertas
SET estado = $1,
    fecha_resolucion = NOW(),
    notas_resolucion = $2
WHERE id = $3;
"#;

pub const UPDATE_ALERTA_REACTIVADA: &str = r#"
UPDATE alertas
SET estado = 'activa',
    fecha_resolucion = NULL,
    notas_resolucion = NULL
WHERE id = $1;
"#;

pub const SELECT_ALERTAS_HISTORIAL: &str = r#"
SELECT id, tipo, mensaje, fecha, severidad, estado,
       captura_id, trampa_id, fecha_resolucion, notas_resolucion
FROM alertas
ORDER BY fecha DESC;
"#;

// Trampas

pub const SELECT_TRAMPAS: &str = r#"
SELECT trampa_id, nombre, ubicacion, status, timestamp, trampa_adhesiva
FROM trampas
ORDER BY trampa_id ASC;
"#;

pub const COUNT_TRAMPAS_ACTIVAS: &str = r#"
SELECT COUNT(*) FROM trampas
WHERE status = 'active' AND timestamp >= NOW() - INTERVAL '45 minutes';
"#;

pub const SELECT_TRAMPAS_DISPONIBLES: &str = r#"
SELECT DISTINCT trampa_id FROM capturas ORDER BY trampa_id ASC;
"#;

pub const INSERT_TRAMPA: &str = r#"
INSERT INTO trampas (nombre, ubicacion, status, timestamp)
VALUES ($1, $2, 'inactive', NOW())
RETURNING trampa_id;
"#;

pub const UPDATE_TRAMPA: &str = r#"
UPDATE trampas SET nombre = $1, ubicacion = $2 WHERE trampa_id = $3;
"#;

pub const DELETE_TRAMPA: &str = r#"
DELETE FROM trampas WHERE trampa_id = $1;
"#;

pub const UPSERT_ESTADO_TRAMPA: &str = r#"
INSERT INTO trampas (trampa_id, status, timestamp, trampa_adhesiva)
VALUES ($1, $2, $3, $4)
ON CONFLICT (trampa_id) DO UPDATE
SET status = EXCLUDED.status,
    timestamp = EXCLUDED.timestamp,
    trampa_adhesiva = EXCLUDED.trampa_adhesiva;
"#;

// Capturas y detecciones

pub const SELECT_CAPTURA_POR_FECHA: &str = r#"
SELECT id FROM capturas WHERE fecha = $1;
"#;

pub const INSERT_CAPTURA: &str = r#"
INSERT INTO capturas (fecha, trampa_id, total_insectos)
VALUES ($1, $2, 0)
RETURNING id;
"#;

pub const INSERT_DETECCION: &str = r#"
INSERT INTO detecciones (captura_id, tipo, cantidad) VALUES ($1, $2, $3);
"#;

pub const REFRESH_TOTAL_CAPTURA: &str = r#"
UPDATE capturas
SET total_insectos = (SELECT COALESCE(SUM(cantidad), 0)::int4 FROM detecciones WHERE captura_id = capturas.id)
WHERE id = $1;
"#;

pub const SELECT_CAPTURAS_CON_DETECCIONES: &str = r#"
SELECT c.id, c.fecha, c.trampa_id, c.total_insectos, d.tipo, d.cantidad
FROM capturas c
LEFT JOIN detecciones d ON d.captura_id = c.id
ORDER BY c.fecha DESC, c.id, d.tipo;
"#;

pub const SELECT_LECTURAS: &str = r#"
SELECT d.id, d.captura_id, d.tipo, d.cantidad, c.fecha, c.trampa_id, t.nombre AS nombre_trampa
FROM detecciones d
JOIN capturas c ON d.captura_id = c.id
LEFT JOIN trampas t ON c.trampa_id = t.trampa_id
ORDER BY c.fecha DESC;
"#;

pub const SELECT_CAPTURA_DE_DETECCION: &str = r#"
SELECT captura_id FROM detecciones WHERE id = $1;
"#;

pub const UPDATE_DETECCION: &str = r#"
UPDATE detecciones SET tipo = $1, cantidad = $2 WHERE id = $3;
"#;

pub const DELETE_DETECCION: &str = r#"
DELETE FROM detecciones WHERE id = $1;
"#;

pub const COUNT_DETECCIONES_DE_CAPTURA: &str = r#"
SELECT COUNT(*) FROM detecciones WHERE captura_id = $1;
"#;

pub const DELETE_CAPTURA: &str = r#"
DELETE FROM capturas WHERE id = $1;
"#;

pub const SELECT_TIPOS_INSECTOS: &str = r#"
SELECT DISTINCT tipo FROM detecciones ORDER BY tipo ASC;
"#;

pub const SELECT_CANTIDAD_ANTERIOR: &str = r#"
SELECT d.cantidad
FROM detecciones d
JOIN capturas c ON d.captura_id = c.id
WHERE c.trampa_id = $1 AND d.tipo = $2 AND c.fecha < $3
ORDER BY c.fecha DESC
LIMIT 1;
"#;

pub const INSERT_INCREMENTO: &str = r#"
INSERT INTO historial_incrementos (fecha, tipo, incremento, trampa_id)
VALUES ($1, $2, $3, $4);
"#;

// Reportes

pub const INCREMENTOS_POR_HORA: &str = r#"
SELECT EXTRACT(HOUR FROM fecha)::int4 AS hora, tipo, SUM(incremento)::int8 AS cantidad
FROM historial_incrementos
WHERE fecha BETWEEN $1 AND $2
GROUP BY 1, 2
ORDER BY 1 ASC;
"#;

pub const INCREMENTOS_TOTALES_POR_HORA: &str = r#"
SELECT EXTRACT(HOUR FROM fecha)::int4 AS hora, SUM(incremento)::int8 AS total
FROM historial_incrementos
WHERE fecha BETWEEN $1 AND $2
GROUP BY 1
ORDER BY 1 ASC;
"#;

pub const INCREMENTOS_POR_DIA: &str = r#"
SELECT fecha::date AS fecha, tipo, SUM(incremento)::int8 AS cantidad
FROM historial_incrementos
WHERE fecha BETWEEN $1 AND $2
GROUP BY 1, 2
ORDER BY 1 ASC;
"#;

pub const ULTIMOS_INCREMENTOS: &str = r#"
SELECT fecha, tipo, incremento AS cantidad, trampa_id
FROM historial_incrementos
ORDER BY fecha DESC
LIMIT 15;
"#;

pub const SELECT_HISTORIAL_INCREMENTOS: &str = r#"
SELECT trampa_id, fecha, tipo, incremento
FROM historial_incrementos
ORDER BY fecha DESC, trampa_id ASC;
"#;

pub const TOTALES_POR_DIA: &str = r#"
SELECT fecha::date AS dia, SUM(incremento)::int8 AS total
FROM historial_incrementos
WHERE fecha >= $1
GROUP BY 1
ORDER BY 1 ASC;
"#;

pub const PROMEDIO_POR_HORA: &str = r#"
SELECT date_trunc('hour', c.fecha) AS fecha,
       ROUND(SUM(d.cantidad)::numeric / COUNT(DISTINCT d.captura_id))::int8 AS promedio
FROM detecciones d
JOIN capturas c ON d.captura_id = c.id
WHERE c.fecha BETWEEN $1 AND $2
GROUP BY 1
ORDER BY 1 ASC;
"#;

pub const PROMEDIO_TIPO_POR_DIA: &str = r#"
SELECT c.fecha::date AS fecha, d.tipo,
       ROUND(SUM(d.cantidad)::numeric / COUNT(DISTINCT d.captura_id))::int8 AS promedio
FROM detecciones d
JOIN capturas c ON d.captura_id = c.id
WHERE c.fecha BETWEEN $1 AND $2
GROUP BY 1, 2
ORDER BY 1 ASC;
"#;

pub const DETECCIONES_POR_TRAMPA: &str = r#"
SELECT c.trampa_id, d.tipo AS tipo_insecto, SUM(d.cantidad)::int8 AS cantidad
FROM detecciones d
JOIN capturas c ON d.captura_id = c.id
WHERE c.fecha::date BETWEEN $1 AND $2
GROUP BY c.trampa_id, d.tipo
ORDER BY c.trampa_id ASC, d.tipo ASC;
"#;

// Configuracion de plagas y umbrales

pub const SELECT_CONFIGURACION_PLAGAS: &str = r#"
SELECT id, tipo_insecto, umbral_promedio, intervalo_minutos, aplicar_por_trampa,
       estado, descripcion, tipo_alerta, notas
FROM configuracion_plagas
ORDER BY id DESC;
"#;

pub const SELECT_REGLAS_ACTIVAS: &str = r#"
SELECT id, tipo_insecto, umbral_promedio, intervalo_minutos, aplicar_por_trampa,
       estado, descripcion, tipo_alerta, notas
FROM configuracion_plagas
WHERE estado = 'activa' AND tipo_insecto = $1;
"#;

pub const INSERT_CONFIGURACION_PLAGA: &str = r#"
INSERT INTO configuracion_plagas
    (tipo_insecto, umbral_promedio, intervalo_minutos, aplicar_por_trampa,
     estado, descripcion, tipo_alerta, notas)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
RETURNING id;
"#;

pub const UPDATE_CONFIGURACION_PLAGA: &str = r#"
UPDATE configuracion_plagas
SET tipo_insecto = $1,
    umbral_promedio = $2,
    intervalo_minutos = $3,
    aplicar_por_trampa = $4,
    estado = $5,
    descripcion = $6,
    tipo_alerta = $7
WHERE id = $8;
"#;

pub const UPDATE_ESTADO_CONFIGURACION_PLAGA: &str = r#"
UPDATE configuracion_plagas SET estado = $1 WHERE id = $2;
"#;

pub const DELETE_CONFIGURACION_PLAGA: &str = r#"
DELETE FROM configuracion_plagas WHERE id = $1;
"#;

pub const SELECT_UMBRALES_POR_PERIODO: &str = r#"
SELECT tipo_insecto, umbral FROM configuracion_umbral WHERE periodo = $1;
"#;

pub const UPSERT_UMBRAL: &str = r#"
INSERT INTO configuracion_umbral (tipo_insecto, periodo, umbral)
VALUES ($1, $2, $3)
ON CONFLICT (tipo_insecto, periodo) DO UPDATE
SET umbral = EXCLUDED.umbral;
"#;

pub const SUMA_INCREMENTOS_VENTANA: &str = r#"
SELECT COALESCE(SUM(incremento), 0)::int8
FROM historial_incrementos
WHERE tipo = $1
  AND fecha >= NOW() - make_interval(mins => $2)
  AND ($3::int4 IS NULL OR trampa_id = $3);
"#;

// Usuarios

pub const SELECT_USUARIO_POR_EMAIL: &str = r#"
SELECT id, email, password FROM usuarios WHERE email = $1;
"#;

pub const INSERT_USUARIO: &str = r#"
INSERT INTO usuarios (email, password, created_at) VALUES ($1, $2, NOW())
RETURNING id;
"#;

pub const SELECT_USUARIOS: &str = r#"
SELECT id, email, created_at FROM usuarios ORDER BY created_at DESC;
"#;

pub const DELETE_USUARIO: &str = r#"
DELETE FROM usuarios WHERE id = $1;
"#;

pub const UPDATE_PASSWORD: &str = r#"
UPDATE usuarios SET password = $1 WHERE email = $2;
"#;

// Mantenimiento fisico

pub const SELECT_MANTENIMIENTOS: &str = r#"
SELECT m.id, m.trampa_id, m.tipo_mantenimiento, m.notas, m.fecha,
       COALESCE(t.nombre, 'Trampa ID ' || m.trampa_id::text) AS nombre_trampa
FROM mantenimiento_fisico m
LEFT JOIN trampas t ON m.trampa_id = t.trampa_id
ORDER BY m.fecha DESC;
"#;

pub const INSERT_MANTENIMIENTO: &str = r#"
INSERT INTO mantenimiento_fisico (trampa_id, tipo_mantenimiento, notas, fecha)
VALUES ($1, $2, $3, COALESCE($4::timestamp, NOW()))
RETURNING id;
"#;

pub const DELETE_MANTENIMIENTO: &str = r#"
DELETE FROM mantenimiento_fisico WHERE id = $1;
"#;
