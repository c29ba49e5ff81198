// Bibliothèque Sweepbot
// Expose tous les modules pour utilisation externe (binaire et tests)

pub mod types;         // Types de base (TileState, Direction, coûts)
pub mod error;         // Erreurs de construction et refus d'actions
pub mod config;        // Configuration et rythme de la simulation
pub mod tile;          // Pièce individuelle
pub mod house;         // Grille de pièces
pub mod robot;         // Déplacements, batterie et nettoyage
pub mod presenter;     // Contrat de présentation
pub mod control;       // Drapeaux partagés et commandes
pub mod chrono;        // Chronomètre de la session
pub mod sweep;         // Boucle de nettoyage autonome
pub mod simulation;    // Hôte: démarrer, mettre en pause, réinitialiser
pub mod snapshot;      // Instantanés sérialisables
pub mod display;       // Affichage terminal et flux JSON

// Ré-exportation des types principaux pour faciliter l'importation
pub use types::*;
pub use error::{MoveRejection, SimError};
pub use config::{Pacing, SimConfig};
pub use house::House;
pub use robot::Robot;
pub use presenter::Presenter;
pub use sweep::{SweepController, SweepOutcome, SweepReport};
pub use simulation::Simulation;
