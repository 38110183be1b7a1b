// src/noyau/valeur.rs
//
// Valeur d’exécution : un réel + l’indication de notation qui servira à l’afficher.
// La notation ne change jamais la charge numérique ; elle ne sert qu’au rendu.
// Les erreurs ne sont pas une variante de Valeur : elles passent par Result<Valeur, ErreurEval>.

use super::contexte::Contexte;
use super::notation::Notation;
use super::reel::Reel;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Valeur {
    pub reel: Reel,
    pub notation: Notation,
}

impl Valeur {
    pub fn new(reel: Reel, notation: Notation) -> Self {
        Self { reel, notation }
    }

    /// Booléen du langage : 1 ou 0, notation automatique.
    pub fn booleen(b: bool) -> Self {
        Valeur::from(if b { Reel::un() } else { Reel::zero() })
    }

    /// Vrai = non nul.
    pub fn est_vrai(&self) -> bool {
        !self.reel.is_zero()
    }

    /// Même valeur, notation remplacée.
    pub fn format_as(&self, notation: Notation) -> Valeur {
        Valeur::new(self.reel.clone(), notation)
    }

    /// Même notation, autre charge (résultat d’une opération sur cette valeur).
    pub fn avec_reel(&self, reel: Reel) -> Valeur {
        Valeur::new(reel, self.notation)
    }

    /// Notation d’un résultat binaire : celle de gauche, sauf si elle est Auto.
    pub fn notation_combinee(gauche: &Valeur, droite: &Valeur) -> Notation {
        match gauche.notation {
            Notation::Auto => droite.notation,
            n => n,
        }
    }

    pub fn to_text(&self, ctx: &Contexte) -> String {
        self.notation.formater(&self.reel, &ctx.reglages)
    }
}

impl From<Reel> for Valeur {
    fn from(reel: Reel) -> Self {
        Valeur::new(reel, Notation::Auto)
    }
}
