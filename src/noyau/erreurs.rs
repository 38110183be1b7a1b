// src/noyau/erreurs.rs
//
// Taxonomie des erreurs du noyau.
// - ErreurAnalyse : lexique + syntaxe (porte toujours une position dans la source)
// - ErreurEval    : évaluation (variables, fonctions, arité, division par zéro, bibliothèque)
// - Erreur        : enveloppe du pipeline complet (une ligne = un résultat ou une erreur)

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErreurAnalyse {
    /// Caractère non reconnu ou littéral mal formé.
    #[error("position {pos} : {message}")]
    Lex { pos: usize, message: String },

    /// Le parseur attendait un jeton et en a trouvé un autre.
    #[error("position {pos} : {attendu} attendu, trouvé {trouve}")]
    Syntaxe {
        pos: usize,
        attendu: String,
        trouve: String,
    },
}

impl ErreurAnalyse {
    pub fn pos(&self) -> usize {
        match self {
            ErreurAnalyse::Lex { pos, .. } | ErreurAnalyse::Syntaxe { pos, .. } => *pos,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErreurEval {
    #[error("variable indéfinie : {0}")]
    VariableIndefinie(String),

    #[error("fonction indéfinie : {0}")]
    FonctionIndefinie(String),

    #[error("{nom} : {attendu} argument(s) attendu(s), {recu} reçu(s)")]
    Arite {
        nom: String,
        attendu: usize,
        recu: usize,
    },

    #[error("division par zéro")]
    DivisionParZero,

    /// Échec interne d’une fonction de bibliothèque (ex: couleur hors plage).
    #[error("{0}")]
    Evaluation(String),
}

impl ErreurEval {
    pub fn evaluation(msg: impl Into<String>) -> Self {
        ErreurEval::Evaluation(msg.into())
    }
}

/// Erreur d’une ligne complète (analyse OU évaluation).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Erreur {
    #[error(transparent)]
    Analyse(#[from] ErreurAnalyse),
    #[error(transparent)]
    Eval(#[from] ErreurEval),
}

impl Erreur {
    /// Position dans la source (erreurs d’analyse seulement).
    pub fn pos(&self) -> Option<usize> {
        match self {
            Erreur::Analyse(e) => Some(e.pos()),
            Erreur::Eval(_) => None,
        }
    }
}
