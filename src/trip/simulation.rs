use std::time::Duration;

use anyhow::Result;
use log::{info, warn};
use rand::{seq::SliceRandom, Rng};
use tokio::time;

use crate::{
    gestures::{GestureEvent, GestureSignalDetector},
    platform::{HapticPattern, HostPlatform},
    runtime::AccessibilityRuntime,
    settings::KeyValueStore,
    speech::{Priority, SpeechDevice},
};

use super::TripEvent;

#[derive(Debug, Clone, Copy)]
pub struct MockDriver {
    pub name: &'static str,
    pub car: &'static str,
    pub color: &'static str,
    pub plate: &'static str,
}

pub const MOCK_DRIVERS: [MockDriver; 4] = [
    MockDriver {
        name: "Carlos Mendoza",
        car: "Nissan Versa",
        color: "blanco",
        plate: "ABC-123",
    },
    MockDriver {
        name: "Lucía Herrera",
        car: "Chevrolet Aveo",
        color: "gris",
        plate: "XYZ-789",
    },
    MockDriver {
        name: "Jorge Ramírez",
        car: "Toyota Corolla",
        color: "negro",
        plate: "JRM-456",
    },
    MockDriver {
        name: "Ana Torres",
        car: "Kia Rio",
        color: "rojo",
        plate: "KTR-321",
    },
];

const TRACKING_HELP: &str = "Comandos disponibles: Sacude el celular para emergencia. \
Doble toque en la pantalla para cancelar viaje. Mantén presionado para opciones.";

/// Play a mocked trip from request to arrival, announcing every phase and
/// exercising the shake gesture halfway through.
///
/// `pace` is the pause between phases.
pub async fn run_simulated_trip<S, D>(
    runtime: &AccessibilityRuntime<S, D>,
    detector: &mut GestureSignalDetector,
    platform: &dyn HostPlatform,
    destination: &str,
    pace: Duration,
) -> Result<()>
where
    S: KeyValueStore + 'static,
    D: SpeechDevice + 'static,
{
    let (driver, mut eta_minutes) = {
        let mut rng = rand::thread_rng();
        let driver = *MOCK_DRIVERS.choose(&mut rng).unwrap_or(&MOCK_DRIVERS[0]);
        (driver, rng.gen_range(2..=5u32))
    };
    info!("Simulating trip to {destination} with {}", driver.name);

    detector.bind_shake(runtime.announcer(
        "Emergencia detectada. Abriendo opciones de ayuda.",
        Priority::Urgent,
    ));

    runtime
        .announce_trip_event(&TripEvent::ScreenEntered {
            screen: "de seguimiento".into(),
            instructions: TRACKING_HELP.into(),
        })
        .await;
    runtime.announce_trip_event(&TripEvent::TripRequested).await;
    time::sleep(pace).await;

    runtime
        .announce_trip_event(&TripEvent::DriverAssigned {
            driver: driver.name.into(),
            car: format!("{} {}", driver.car, driver.color),
        })
        .await;

    while eta_minutes > 0 {
        time::sleep(pace).await;
        runtime
            .announce_trip_event(&TripEvent::DriverArriving { eta_minutes })
            .await;
        if eta_minutes == 2 {
            // Rider shakes the phone while waiting.
            for _ in 0..5 {
                if detector.on_raw_motion_sample(2.1, 1.4, 0.9) == Some(GestureEvent::Shake) {
                    info!("Shake gesture recognised during pickup");
                }
            }
            detector.on_raw_motion_sample(0.0, 0.0, 1.0);
        }
        eta_minutes -= 1;
    }

    time::sleep(pace).await;
    if let Err(err) = platform.vibrate(HapticPattern::Success) {
        warn!("Arrival haptic failed: {err:#}");
    }
    runtime
        .announce_trip_event(&TripEvent::DriverArrived {
            driver: format!("{}, placas {}", driver.name, driver.plate),
        })
        .await;

    time::sleep(pace).await;
    runtime
        .announce_trip_event(&TripEvent::TripStarted {
            destination: destination.into(),
        })
        .await;

    time::sleep(pace).await;
    runtime.announce_trip_event(&TripEvent::TripCompleted).await;

    Ok(())
}
