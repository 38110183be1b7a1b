// src/noyau/jetons.rs

use std::fmt;

use super::erreurs::ErreurAnalyse;
use super::notation::RECONNAISSEURS;
use super::valeur::Valeur;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenreJeton {
    Ident,
    Nombre,
    Operateur,
    Ponctuation,
    Fin,
}

/// Littéral déjà lu ; sa valeur porte la notation du reconnaisseur (rendu aller-retour).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndiceNombre {
    pub valeur: Valeur,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Jeton {
    pub genre: GenreJeton,
    /// Décalage (octets) dans la ligne source.
    pub pos: usize,
    pub texte: String,
    pub indice: Option<IndiceNombre>,
}

impl Jeton {
    fn new(genre: GenreJeton, pos: usize, texte: &str) -> Self {
        Self {
            genre,
            pos,
            texte: texte.to_string(),
            indice: None,
        }
    }

    pub fn est(&self, genre: GenreJeton, texte: &str) -> bool {
        self.genre == genre && self.texte == texte
    }
}

impl fmt::Display for Jeton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.genre {
            GenreJeton::Fin => f.write_str("fin de ligne"),
            _ => write!(f, "'{}'", self.texte),
        }
    }
}

/// Opérateurs de deux caractères (essayés avant les simples).
const OPERATEURS_DOUBLES: [&str; 8] = ["<<", ">>", "<=", ">=", "==", "!=", "&&", "||"];
const OPERATEURS_SIMPLES: &str = "+-*/%^&|<>!=";
const PONCTUATION: &str = "(),";

/// Tokenize une ligne en jetons (toujours terminée par un jeton Fin).
/// Supporte:
/// - littéraux via le registre de notations (0x1F, 0b1010, 0o17, 12, 1.5, .5, 1e7, 1_000)
/// - identifiants [A-Za-z_][A-Za-z0-9_]* (casse conservée)
/// - opérateurs + - * / % ^ & | < > ! = << >> <= >= == != && ||
/// - ponctuation ( ) ,
pub fn tokenize(s: &str) -> Result<Vec<Jeton>, ErreurAnalyse> {
    let mut out = Vec::new();
    let mut i: usize = 0;

    while let Some(c) = s[i..].chars().next() {
        let reste = &s[i..];

        if c.is_whitespace() {
            i += c.len_utf8();
            continue;
        }

        // Nombre : chiffre, ou '.' suivi d’un chiffre
        if debute_nombre(reste) {
            let jeton = lire_nombre(reste, i)?;
            i += jeton.texte.len();
            out.push(jeton);
            continue;
        }

        // Identifiants ASCII
        if c.is_ascii_alphabetic() || c == '_' {
            let n = reste
                .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_'))
                .unwrap_or(reste.len());
            out.push(Jeton::new(GenreJeton::Ident, i, &reste[..n]));
            i += n;
            continue;
        }

        // Opérateurs
        if let Some(op) = OPERATEURS_DOUBLES.iter().find(|op| reste.starts_with(**op)) {
            out.push(Jeton::new(GenreJeton::Operateur, i, op));
            i += op.len();
            continue;
        }
        if OPERATEURS_SIMPLES.contains(c) {
            out.push(Jeton::new(GenreJeton::Operateur, i, &reste[..1]));
            i += 1;
            continue;
        }

        // Ponctuation
        if PONCTUATION.contains(c) {
            out.push(Jeton::new(GenreJeton::Ponctuation, i, &reste[..1]));
            i += 1;
            continue;
        }

        return Err(ErreurAnalyse::Lex {
            pos: i,
            message: format!("caractère inattendu : '{c}'"),
        });
    }

    out.push(Jeton::new(GenreJeton::Fin, s.len(), ""));
    Ok(out)
}

fn debute_nombre(reste: &str) -> bool {
    let mut it = reste.chars();
    match it.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('.') => it.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

/// Essaie les reconnaisseurs dans l’ordre ; le premier qui correspond gagne.
fn lire_nombre(reste: &str, pos: usize) -> Result<Jeton, ErreurAnalyse> {
    for r in RECONNAISSEURS.iter() {
        let Some((longueur, capture)) = r.correspondance(reste) else {
            continue;
        };

        // un littéral ne doit pas être collé à un mot ou à un autre point : "0xZZ", "1.2.3", "2pi"
        if let Some(c) = reste[longueur..].chars().next() {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                return Err(ErreurAnalyse::Lex {
                    pos: pos + longueur,
                    message: format!("littéral numérique mal formé : '{}{c}'", &reste[..longueur]),
                });
            }
        }

        let valeur = r.parse(capture).ok_or_else(|| ErreurAnalyse::Lex {
            pos,
            message: format!("littéral hors plage : '{}'", &reste[..longueur]),
        })?;

        let mut jeton = Jeton::new(GenreJeton::Nombre, pos, &reste[..longueur]);
        jeton.indice = Some(IndiceNombre { valeur });
        return Ok(jeton);
    }

    Err(ErreurAnalyse::Lex {
        pos,
        message: "littéral numérique attendu".into(),
    })
}

/// Format utilitaire (traces) : liste de jetons en texte.
pub fn format_jetons(jetons: &[Jeton]) -> String {
    jetons
        .iter()
        .filter(|j| j.genre != GenreJeton::Fin)
        .map(|j| j.texte.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
