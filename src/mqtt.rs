use crate::config::AppConfig;
use crate::db::DbPool;
use crate::processor::message_processor;
use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Runs the MQTT ingestion loop: one subscription per topic, each publish
/// processed in a background task so a slow insert never blocks the event
/// loop.
pub async fn start_mqtt_client(config: &AppConfig, pool: DbPool) -> anyhow::Result<()> {
    let client_id = format!("insectos-monitor-{}", Uuid::new_v4());
    let mut mqttoptions = MqttOptions::new(client_id, &config.mqtt_broker, config.mqtt_port);
    mqttoptions.set_keep_alive(Duration::from_secs(5));
    if !config.mqtt_username.is_empty() {
        mqttoptions.set_credentials(&config.mqtt_username, &config.mqtt_password);
    }

    let (client, mut eventloop) = AsyncClient::new(mqttoptions, 100); // Capacidad del canal

    client
        .subscribe(&config.mqtt_topic_detecciones, QoS::AtLeastOnce)
        .await?;
    client
        .subscribe(&config.mqtt_topic_trampas, QoS::AtLeastOnce)
        .await?;
    info!(
        "Subscribed to {} and {}",
        config.mqtt_topic_detecciones, config.mqtt_topic_trampas
    );

    let pool = Arc::new(pool);
    let topic_detecciones = config.mqtt_topic_detecciones.clone();
    let topic_trampas = config.mqtt_topic_trampas.clone();

    loop {
        match eventloop.poll().await {
            Ok(notification) => match notification {
                Event::Incoming(Packet::Publish(publish)) => {
                    let pool_clone = pool.clone();
                    let topic_detecciones = topic_detecciones.clone();
                    let topic_trampas = topic_trampas.clone();
                    tokio::spawn(async move {
                        let resultado = if publish.topic == topic_detecciones {
                            message_processor::process_deteccion(&pool_clone, &publish.payload)
                                .await
                        } else if publish.topic == topic_trampas {
                            message_processor::process_estado_trampa(&pool_clone, &publish.payload)
                                .await
                        } else {
                            warn!("Message on unexpected topic: {}", publish.topic);
                            Ok(())
                        };
                        if let Err(e) = resultado {
                            error!("Error processing message: {}", e);
                        }
                    });
                }
                Event::Incoming(Packet::ConnAck(_)) => {
                    info!("MQTT Connected!");
                }
                Event::Incoming(Packet::SubAck(_)) => {
                    info!("Subscription confirmed!");
                }
                _ => {}
            },
            Err(e) => {
                error!("MQTT Connection error: {}", e);
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }
    }
}
