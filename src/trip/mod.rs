//! Spoken copy for the trip lifecycle.
//!
//! Screens own the content (driver names, ETAs, destinations); this module
//! only fixes the wording and how urgent each kind of update is.

pub mod simulation;

use serde::{Deserialize, Serialize};

use crate::speech::Priority;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum TripEvent {
    ScreenEntered { screen: String, instructions: String },
    TripRequested,
    DriverAssigned { driver: String, car: String },
    DriverArriving { eta_minutes: u32 },
    DriverArrived { driver: String },
    TripStarted { destination: String },
    TripCompleted,
    TripCancelled,
    ActionConfirmed { action: String },
    ActionCancelled { action: String },
    Error { message: String },
    EmergencyActivated,
}

impl TripEvent {
    pub fn priority(&self) -> Priority {
        match self {
            TripEvent::DriverArrived { .. } | TripEvent::EmergencyActivated => Priority::Urgent,
            TripEvent::DriverArriving { .. }
            | TripEvent::ActionConfirmed { .. }
            | TripEvent::ActionCancelled { .. } => Priority::Normal,
            _ => Priority::High,
        }
    }

    pub fn message(&self) -> String {
        match self {
            TripEvent::ScreenEntered {
                screen,
                instructions,
            } => {
                if instructions.is_empty() {
                    format!("Pantalla {screen}.")
                } else {
                    format!("Pantalla {screen}. {instructions}")
                }
            }
            TripEvent::TripRequested => {
                "Viaje solicitado. Buscando conductor disponible.".to_string()
            }
            TripEvent::DriverAssigned { driver, car } => {
                format!("Conductor asignado. {driver} va en camino en un {car}.")
            }
            TripEvent::DriverArriving { eta_minutes: 1 } => {
                "Tu conductor llegará en 1 minuto.".to_string()
            }
            TripEvent::DriverArriving { eta_minutes } => {
                format!("Tu conductor llegará en {eta_minutes} minutos.")
            }
            TripEvent::DriverArrived { driver } => {
                format!("{driver} ha llegado. Por favor dirígete al vehículo.")
            }
            TripEvent::TripStarted { destination } => {
                format!("Viaje iniciado. En camino a {destination}.")
            }
            TripEvent::TripCompleted => "Has llegado a tu destino. Viaje completado.".to_string(),
            TripEvent::TripCancelled => "Viaje cancelado exitosamente.".to_string(),
            TripEvent::ActionConfirmed { action } => format!("{action} confirmado."),
            TripEvent::ActionCancelled { action } => format!("{action} cancelado."),
            TripEvent::Error { message } => format!("Error: {message}"),
            TripEvent::EmergencyActivated => {
                "Botón de emergencia activado. Selecciona una opción.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrival_and_emergency_interrupt() {
        let arrived = TripEvent::DriverArrived {
            driver: "Carlos".into(),
        };
        assert_eq!(arrived.priority(), Priority::Urgent);
        assert_eq!(TripEvent::EmergencyActivated.priority(), Priority::Urgent);
        assert_eq!(
            TripEvent::DriverArriving { eta_minutes: 4 }.priority(),
            Priority::Normal
        );
        assert_eq!(TripEvent::TripRequested.priority(), Priority::High);
    }

    #[test]
    fn copy_includes_screen_supplied_content() {
        let assigned = TripEvent::DriverAssigned {
            driver: "Lucía".into(),
            car: "Nissan Versa".into(),
        };
        assert_eq!(
            assigned.message(),
            "Conductor asignado. Lucía va en camino en un Nissan Versa."
        );
        assert_eq!(
            TripEvent::DriverArriving { eta_minutes: 1 }.message(),
            "Tu conductor llegará en 1 minuto."
        );
        assert_eq!(
            TripEvent::ScreenEntered {
                screen: "Inicio".into(),
                instructions: String::new()
            }
            .message(),
            "Pantalla Inicio."
        );
    }
}
