//! Noyau de la calculatrice à lignes
//!
//! Organisation interne :
//! - reel.rs      : réel décimal exact à échelle fixe (+ π, e)
//! - notation.rs  : registre des notations (lecture des littéraux + affichage)
//! - valeur.rs    : réel + notation
//! - reglages.rs  : réglages d’affichage (TOML)
//! - contexte.rs  : variables d’une passe (+ Ans, constantes)
//! - jetons.rs    : tokenisation
//! - syntaxe.rs   : descente récursive -> Expr
//! - expr.rs      : AST + évaluation
//! - biblio.rs    : table des fonctions (math, notations, couleurs)
//! - couleurs.rs  : RGB / HSV / HSL / YUV
//! - eval.rs      : pipeline d’une ligne + passe de recalcul

pub mod biblio;
pub mod contexte;
pub mod couleurs;
pub mod erreurs;
pub mod eval;
pub mod expr;
pub mod jetons;
pub mod notation;
pub mod reel;
pub mod reglages;
pub mod syntaxe;
pub mod valeur;

#[cfg(test)]
mod tests_proprietes;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use eval::{recalculer, ModeRadix, Resultat};
pub use reglages::Reglages;
