// src/noyau/notation.rs
//
// Registre des notations numériques.
// Chaque reconnaisseur sert deux fois :
// - à la lecture : motif ancré + groupe de capture => Valeur (notation attachée)
// - à l’affichage : Valeur + Reglages => texte
//
// Ordre du registre = ordre d’essai (premier qui correspond gagne) :
// hex, binaire, octal, puis le réel générique (décimal / scientifique).

use lazy_static::lazy_static;
use num_bigint::BigInt;
use num_traits::{One, Signed};
use regex::Regex;

use super::reel::{div_arrondi, pow10, texte_echelonne, Reel, ECHELLE};
use super::reglages::Reglages;
use super::valeur::Valeur;

/// Indication d’affichage portée par une Valeur.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Notation {
    /// Réel générique : décimal ou scientifique selon les Reglages.
    #[default]
    Auto,
    /// Décimal simple, jamais scientifique.
    Decimal,
    Hex,
    Binaire,
    Octal,
}

impl Notation {
    /// Base, préfixe et taille des groupes `_` pour les notations entières.
    fn radix(self) -> Option<(u32, &'static str, usize)> {
        match self {
            Notation::Hex => Some((16, "0x", 4)),
            Notation::Binaire => Some((2, "0b", 4)),
            Notation::Octal => Some((8, "0o", 3)),
            Notation::Auto | Notation::Decimal => None,
        }
    }

    /// Rend un réel dans cette notation.
    pub fn formater(self, x: &Reel, reglages: &Reglages) -> String {
        match self {
            Notation::Auto => formater_reel(x, reglages, true),
            Notation::Decimal => formater_reel(x, reglages, false),
            Notation::Hex | Notation::Binaire | Notation::Octal => {
                // non entier ou négatif hors 64 bits : rendu Auto (scientifique possible)
                formater_radix(x, self).unwrap_or_else(|| formater_reel(x, reglages, true))
            }
        }
    }
}

/* ------------------------ Reconnaisseurs ------------------------ */

pub struct Reconnaisseur {
    pub notation: Notation,
    pub prefixe: &'static str,
    pub motif: Regex,
    pub groupe: usize,
}

lazy_static! {
    pub static ref RECONNAISSEURS: Vec<Reconnaisseur> = vec![
        Reconnaisseur {
            notation: Notation::Hex,
            prefixe: "0x",
            motif: Regex::new(r"^0[xX]([0-9a-fA-F][0-9a-fA-F_]*)").expect("motif hex"),
            groupe: 1,
        },
        Reconnaisseur {
            notation: Notation::Binaire,
            prefixe: "0b",
            motif: Regex::new(r"^0[bB]([01][01_]*)").expect("motif binaire"),
            groupe: 1,
        },
        Reconnaisseur {
            notation: Notation::Octal,
            prefixe: "0o",
            motif: Regex::new(r"^0[oO]([0-7][0-7_]*)").expect("motif octal"),
            groupe: 1,
        },
        Reconnaisseur {
            notation: Notation::Auto,
            prefixe: "",
            motif: Regex::new(
                r"^([0-9][0-9_]*(?:\.[0-9][0-9_]*)?(?:[eE][+-]?[0-9]+)?|\.[0-9][0-9_]*(?:[eE][+-]?[0-9]+)?)"
            )
            .expect("motif réel"),
            groupe: 1,
        },
    ];
}

impl Reconnaisseur {
    /// Essaie le motif en tête de `source`.
    /// Retourne (longueur consommée, texte du groupe de capture).
    pub fn correspondance<'a>(&self, source: &'a str) -> Option<(usize, &'a str)> {
        // filtre rapide sur le préfixe avant le motif complet
        let n = self.prefixe.len();
        if n > 0 && !source.get(..n).is_some_and(|p| p.eq_ignore_ascii_case(self.prefixe)) {
            return None;
        }

        let caps = self.motif.captures(source)?;
        let tout = caps.get(0)?;
        let groupe = caps.get(self.groupe)?;
        Some((tout.end(), groupe.as_str()))
    }

    /// Construit la Valeur du littéral capturé, notation du reconnaisseur attachée.
    pub fn parse(&self, capture: &str) -> Option<Valeur> {
        let reel = match self.notation.radix() {
            Some((base, _, _)) => Reel::parse_radix(capture, base)?,
            None => Reel::parse(capture)?,
        };
        Some(Valeur::new(reel, self.notation))
    }

    #[cfg(test)]
    pub fn formater(&self, v: &Valeur, reglages: &Reglages) -> String {
        self.notation.formater(&v.reel, reglages)
    }
}

/* ------------------------ Affichage réel ------------------------ */

fn formater_reel(x: &Reel, reglages: &Reglages, scientifique_permis: bool) -> String {
    let Some(exposant) = x.exposant10() else {
        return "0".to_string();
    };
    let longueur = reglages.longueur_decimale_max.min(ECHELLE);

    if scientifique_permis
        && reglages.scientifique
        && (exposant >= reglages.exposant_positif_min
            || exposant < -reglages.exposant_negatif_max)
    {
        return formater_scientifique(x, exposant, longueur, reglages.alignement_scientifique);
    }

    // arrondi à `longueur` chiffres fractionnaires
    let q = div_arrondi(x.mantisse(), &pow10(ECHELLE - longueur));
    texte_echelonne(&q, longueur)
}

/// mantisse·10^exposant ; mantisse dans [1,10) ou [1,1000) si aligné.
fn formater_scientifique(x: &Reel, exposant: i64, longueur: usize, aligne: bool) -> String {
    let pas: i64 = if aligne { 3 } else { 1 };
    let mut e = exposant.div_euclid(pas) * pas;

    loop {
        // q = arrondi(mantisse · 10^longueur / 10^(ECHELLE + e))
        let decalage = ECHELLE as i64 + e - longueur as i64;
        let q = if decalage >= 0 {
            div_arrondi(x.mantisse(), &pow10(decalage as usize))
        } else {
            x.mantisse() * pow10((-decalage) as usize)
        };

        // l’arrondi peut faire déborder la mantisse (9.9999 -> 10)
        if q.abs() >= pow10(longueur + pas as usize) {
            e += pas;
            continue;
        }

        return format!("{}e{}", texte_echelonne(&q, longueur), e);
    }
}

/* ------------------------ Affichage radix ------------------------ */

/// Entiers seulement. Négatifs : complément à deux sur 32 bits (ou 64 si nécessaire).
fn formater_radix(x: &Reel, notation: Notation) -> Option<String> {
    let (base, prefixe, taille_groupe) = notation.radix()?;
    if !x.est_entier() {
        return None;
    }

    let mut n = x.partie_entiere();
    if n.is_negative() {
        let largeur = if n >= -(BigInt::one() << 31usize) {
            32usize
        } else if n >= -(BigInt::one() << 63usize) {
            64usize
        } else {
            return None;
        };
        n += BigInt::one() << largeur;
    }

    let chiffres = n.to_str_radix(base).to_uppercase();
    Some(format!("{prefixe}{}", grouper(&chiffres, taille_groupe)))
}

/// Insère `_` tous les `taille` chiffres, en partant de la droite.
fn grouper(chiffres: &str, taille: usize) -> String {
    let n = chiffres.len();
    let mut out = String::with_capacity(n + n / taille);
    for (i, c) in chiffres.chars().enumerate() {
        if i > 0 && (n - i) % taille == 0 {
            out.push('_');
        }
        out.push(c);
    }
    out
}
