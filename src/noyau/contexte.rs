// src/noyau/contexte.rs
//
// Contexte d’évaluation : variables (nom -> Valeur, sensible à la casse) + réglages.
// Un Contexte par passe de recalcul ; un seul écrivain à la fois, aucun verrou.

use std::collections::HashMap;

use super::erreurs::ErreurEval;
use super::reel::Reel;
use super::reglages::Reglages;
use super::valeur::Valeur;

/// Registre du dernier résultat réussi de la passe.
pub const ANS: &str = "Ans";

#[derive(Clone, Debug, Default)]
pub struct Contexte {
    variables: HashMap<String, Valeur>,
    pub reglages: Reglages,
}

impl Contexte {
    pub fn new(reglages: Reglages) -> Self {
        Self {
            variables: HashMap::new(),
            reglages,
        }
    }

    /// Emplacement mutable d’une variable.
    /// - absente + `creer` : créée à 0
    /// - absente sinon : VariableIndefinie
    pub fn reference(&mut self, nom: &str, creer: bool) -> Result<&mut Valeur, ErreurEval> {
        if creer {
            return Ok(self
                .variables
                .entry(nom.to_string())
                .or_insert_with(|| Valeur::from(Reel::zero())));
        }
        self.variables
            .get_mut(nom)
            .ok_or_else(|| ErreurEval::VariableIndefinie(nom.to_string()))
    }

    /// Retire une liaison. Absente : tolérée si `tolerer_absent`, sinon VariableIndefinie.
    pub fn undef(&mut self, nom: &str, tolerer_absent: bool) -> Result<(), ErreurEval> {
        if self.variables.remove(nom).is_none() && !tolerer_absent {
            return Err(ErreurEval::VariableIndefinie(nom.to_string()));
        }
        Ok(())
    }

    /// Lecture : variables d’abord (elles masquent les constantes), puis PI / E.
    pub fn lire(&self, nom: &str) -> Result<Valeur, ErreurEval> {
        if let Some(v) = self.variables.get(nom) {
            return Ok(v.clone());
        }
        match nom {
            "PI" => Ok(Valeur::from(Reel::pi())),
            "E" => Ok(Valeur::from(Reel::e())),
            _ => Err(ErreurEval::VariableIndefinie(nom.to_string())),
        }
    }

    #[cfg(test)]
    pub fn est_defini(&self, nom: &str) -> bool {
        self.variables.contains_key(nom)
    }
}
