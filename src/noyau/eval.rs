//! Noyau — évaluation (pipeline d’une ligne, passe de recalcul)
//!
//! texte -> jetons -> Expr -> Valeur -> (forçage radix) -> texte
//!
//! Une passe de recalcul partage un seul Contexte entre toutes les lignes :
//! les variables affectées et `Ans` circulent de haut en bas.

use super::contexte::{Contexte, ANS};
use super::erreurs::Erreur;
use super::notation::Notation;
use super::reglages::Reglages;

pub use super::syntaxe::parse;

/// Forçage d’affichage choisi par ligne.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ModeRadix {
    #[default]
    Auto,
    Dec,
    Hex,
    Bin,
    Oct,
}

impl ModeRadix {
    pub const TOUS: [ModeRadix; 5] = [
        ModeRadix::Auto,
        ModeRadix::Dec,
        ModeRadix::Hex,
        ModeRadix::Bin,
        ModeRadix::Oct,
    ];

    pub fn libelle(self) -> &'static str {
        match self {
            ModeRadix::Auto => "Auto",
            ModeRadix::Dec => "Dec",
            ModeRadix::Hex => "Hex",
            ModeRadix::Bin => "Bin",
            ModeRadix::Oct => "Oct",
        }
    }

    /// Notation imposée (None = garder celle de la valeur).
    pub fn notation(self) -> Option<Notation> {
        match self {
            ModeRadix::Auto => None,
            ModeRadix::Dec => Some(Notation::Decimal),
            ModeRadix::Hex => Some(Notation::Hex),
            ModeRadix::Bin => Some(Notation::Binaire),
            ModeRadix::Oct => Some(Notation::Octal),
        }
    }
}

/// Évalue une ligne dans `ctx` et rend la réponse.
/// - succès : `Ans` reçoit la valeur (forçage radix compris)
/// - échec  : `Ans` est retiré du contexte
pub fn evaluer_ligne(texte: &str, mode: ModeRadix, ctx: &mut Contexte) -> Result<String, Erreur> {
    let resultat = parse(texte)
        .map_err(Erreur::from)
        .and_then(|e| e.eval(ctx).map_err(Erreur::from));

    match resultat {
        Ok(v) => {
            let v = match mode.notation() {
                Some(n) => v.format_as(n),
                None => v,
            };
            let texte = v.to_text(ctx);
            *ctx.reference(ANS, true)? = v;
            Ok(texte)
        }
        Err(e) => {
            // tolérant : Ans peut ne pas exister encore
            ctx.undef(ANS, true)?;
            Err(e)
        }
    }
}

/// Résultat d’une ligne de la liste.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resultat {
    /// Ligne vide : ni évaluée, ni effet sur `Ans`.
    Vide,
    Valeur(String),
    Erreur(Erreur),
}

impl Resultat {
    /// Texte affiché à droite de la ligne.
    pub fn texte(&self) -> String {
        match self {
            Resultat::Vide => String::new(),
            Resultat::Valeur(t) => t.clone(),
            Resultat::Erreur(e) => format!("? {e}"),
        }
    }

    pub fn est_erreur(&self) -> bool {
        matches!(self, Resultat::Erreur(_))
    }

    /// Position de l’erreur d’analyse dans la ligne, s’il y en a une.
    pub fn position(&self) -> Option<usize> {
        match self {
            Resultat::Erreur(e) => e.pos(),
            _ => None,
        }
    }
}

/// Recalcule toutes les lignes dans l’ordre, avec un Contexte neuf.
/// Une erreur n’interrompt pas la passe.
pub fn recalculer<S: AsRef<str>>(lignes: &[(S, ModeRadix)], reglages: &Reglages) -> Vec<Resultat> {
    let _span = tracing::debug_span!("recalcul", lignes = lignes.len()).entered();
    let mut ctx = Contexte::new(reglages.clone());

    lignes
        .iter()
        .enumerate()
        .map(|(i, (texte, mode))| {
            let texte = texte.as_ref();
            if texte.trim().is_empty() {
                return Resultat::Vide;
            }
            match evaluer_ligne(texte, *mode, &mut ctx) {
                Ok(reponse) => {
                    tracing::debug!(ligne = i, %texte, %reponse, "évaluée");
                    Resultat::Valeur(reponse)
                }
                Err(e) => {
                    tracing::debug!(ligne = i, %texte, erreur = %e, pos = ?e.pos(), "échec");
                    Resultat::Erreur(e)
                }
            }
        })
        .collect()
}
