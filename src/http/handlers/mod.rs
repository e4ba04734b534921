pub mod alertas;
pub mod capturas;
pub mod configuracion;
pub mod mantenimiento;
pub mod reportes;
pub mod trampas;
pub mod usuarios;
