// src/noyau/reglages.rs
//
// Réglages d’affichage numérique.
// - objet de configuration pur, copié par valeur dans chaque Contexte (aucun singleton)
// - persistance TOML dans le répertoire de configuration de l’utilisateur
// - en wasm (pas de répertoire de configuration) : valeurs par défaut, sauvegarde ignorée

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DOSSIER_APP: &str = "calculatrice-lignes";
const FICHIER: &str = "reglages.toml";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reglages {
    /// Nombre maximal de chiffres après la virgule à l’affichage.
    pub longueur_decimale_max: usize,
    /// Autorise la notation scientifique (`1.5e7`).
    pub scientifique: bool,
    /// Exposant à partir duquel on passe en notation scientifique.
    pub exposant_positif_min: i64,
    /// Passage en notation scientifique quand l’exposant est < -exposant_negatif_max.
    pub exposant_negatif_max: i64,
    /// Exposant aligné sur un multiple de 3 (notation ingénieur).
    pub alignement_scientifique: bool,
}

impl Default for Reglages {
    fn default() -> Self {
        Self {
            longueur_decimale_max: 9,
            scientifique: true,
            exposant_positif_min: 15,
            exposant_negatif_max: 5,
            alignement_scientifique: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ErreurReglages {
    #[error("accès au fichier de réglages : {0}")]
    Io(#[from] std::io::Error),
    #[error("réglages illisibles : {0}")]
    Lecture(#[from] toml::de::Error),
    #[error("réglages non sérialisables : {0}")]
    Ecriture(#[from] toml::ser::Error),
}

impl Reglages {
    /// Chemin du fichier de réglages (None si la plateforme n’en a pas).
    pub fn chemin() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(DOSSIER_APP).join(FICHIER))
    }

    /// Charge les réglages persistés ; tout échec retombe sur les valeurs par défaut.
    pub fn charger() -> Reglages {
        let Some(chemin) = Self::chemin() else {
            return Reglages::default();
        };
        if !chemin.exists() {
            return Reglages::default();
        }

        match Self::charger_depuis(&chemin) {
            Ok(r) => {
                tracing::debug!(chemin = %chemin.display(), "réglages chargés");
                r
            }
            Err(e) => {
                tracing::warn!(chemin = %chemin.display(), erreur = %e, "réglages ignorés");
                Reglages::default()
            }
        }
    }

    pub fn charger_depuis(chemin: &Path) -> Result<Reglages, ErreurReglages> {
        let texte = fs::read_to_string(chemin)?;
        Ok(toml::from_str(&texte)?)
    }

    /// Sauvegarde dans le répertoire de configuration (no-op si indisponible).
    pub fn sauver(&self) -> Result<(), ErreurReglages> {
        match Self::chemin() {
            Some(chemin) => self.sauver_vers(&chemin),
            None => Ok(()),
        }
    }

    pub fn sauver_vers(&self, chemin: &Path) -> Result<(), ErreurReglages> {
        if let Some(parent) = chemin.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(chemin, toml::to_string(self)?)?;
        Ok(())
    }
}
