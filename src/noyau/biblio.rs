// src/noyau/biblio.rs
//
// Bibliothèque standard : table statique de fonctions (nom, arité, aide, corps).
// - plusieurs entrées peuvent partager un nom (surcharge par arité : rgb2yuv/1, rgb2yuv/3)
// - recherche par nom exact (sensible à la casse)
// - couleurs empaquetées : résultat en notation Hex

use super::couleurs::{self, Canaux};
use super::erreurs::ErreurEval;
use super::notation::Notation;
use super::reel::Reel;
use super::valeur::Valeur;

pub struct Fonction {
    pub nom: &'static str,
    pub arite: usize,
    pub aide: &'static str,
    pub corps: fn(&[Valeur]) -> Result<Valeur, ErreurEval>,
}

impl Fonction {
    /// Signature lisible : `clamp(x, lo, hi)` devient `clamp/3`.
    pub fn signature(&self) -> String {
        format!("{}/{}", self.nom, self.arite)
    }
}

/// Même notation que le premier argument.
fn comme(a: &[Valeur], reel: Reel) -> Valeur {
    a[0].avec_reel(reel)
}

fn couleur(reel: Reel) -> Valeur {
    Valeur::new(reel, Notation::Hex)
}

/// Composante d’une conversion appliquée à une couleur empaquetée.
fn composante(
    a: &[Valeur],
    conversion: fn(&Reel, &Reel, &Reel) -> Canaux,
    choix: fn(Canaux) -> Reel,
) -> Result<Valeur, ErreurEval> {
    let (x, y, z) = couleurs::unpack(&a[0].reel)?;
    Ok(Valeur::from(choix(conversion(&x, &y, &z))))
}

/// Composante d’une conversion de trois arguments (réel non saturé).
fn composante3(
    a: &[Valeur],
    conversion: fn(&Reel, &Reel, &Reel) -> Canaux,
    choix: fn(Canaux) -> Reel,
) -> Valeur {
    Valeur::from(choix(conversion(&a[0].reel, &a[1].reel, &a[2].reel)))
}

/// Conversion de trois composantes vers une couleur empaquetée.
fn empaqueter(a: &[Valeur], conversion: fn(&Reel, &Reel, &Reel) -> Canaux) -> Valeur {
    couleur(couleurs::pack_canaux(&conversion(&a[0].reel, &a[1].reel, &a[2].reel)))
}

/// Conversion d’une couleur empaquetée vers une autre couleur empaquetée.
fn reempaqueter(
    a: &[Valeur],
    conversion: fn(&Reel, &Reel, &Reel) -> Canaux,
) -> Result<Valeur, ErreurEval> {
    let (x, y, z) = couleurs::unpack(&a[0].reel)?;
    Ok(couleur(couleurs::pack_canaux(&conversion(&x, &y, &z))))
}

fn premier(c: Canaux) -> Reel {
    c.0
}

fn deuxieme(c: Canaux) -> Reel {
    c.1
}

fn troisieme(c: Canaux) -> Reel {
    c.2
}

pub static FONCTIONS: &[Fonction] = &[
    /* ---- math ---- */
    Fonction {
        nom: "abs",
        arite: 1,
        aide: "valeur absolue",
        corps: |a| Ok(comme(a, a[0].reel.abs())),
    },
    Fonction {
        nom: "sign",
        arite: 1,
        aide: "signe : -1, 0 ou 1",
        corps: |a| Ok(Valeur::from(a[0].reel.signe())),
    },
    Fonction {
        nom: "min",
        arite: 2,
        aide: "plus petit des deux arguments",
        corps: |a| Ok(if a[1].reel < a[0].reel { a[1].clone() } else { a[0].clone() }),
    },
    Fonction {
        nom: "max",
        arite: 2,
        aide: "plus grand des deux arguments",
        corps: |a| Ok(if a[1].reel > a[0].reel { a[1].clone() } else { a[0].clone() }),
    },
    Fonction {
        nom: "round",
        arite: 1,
        aide: "arrondi à l’entier, demi au pair",
        corps: |a| Ok(comme(a, a[0].reel.arrondi())),
    },
    Fonction {
        nom: "floor",
        arite: 1,
        aide: "partie entière inférieure",
        corps: |a| Ok(comme(a, a[0].reel.plancher())),
    },
    Fonction {
        nom: "ceil",
        arite: 1,
        aide: "partie entière supérieure",
        corps: |a| Ok(comme(a, a[0].reel.plafond())),
    },
    Fonction {
        nom: "trunc",
        arite: 1,
        aide: "troncature vers zéro",
        corps: |a| Ok(comme(a, a[0].reel.tronque())),
    },
    Fonction {
        nom: "sqrt",
        arite: 1,
        aide: "racine carrée",
        corps: |a| Ok(comme(a, a[0].reel.racine_carree()?)),
    },
    Fonction {
        nom: "pow",
        arite: 2,
        aide: "x^n, n entier",
        corps: |a| Ok(comme(a, a[0].reel.puissance(&a[1].reel)?)),
    },
    Fonction {
        nom: "clamp",
        arite: 3,
        aide: "x borné à [lo, hi]",
        corps: |a| {
            if a[1].reel > a[2].reel {
                return Err(ErreurEval::evaluation("clamp : bornes inversées"));
            }
            let x = a[0].reel.clone().max(a[1].reel.clone()).min(a[2].reel.clone());
            Ok(comme(a, x))
        },
    },
    /* ---- notations ---- */
    Fonction {
        nom: "hex",
        arite: 1,
        aide: "affichage hexadécimal",
        corps: |a| Ok(a[0].format_as(Notation::Hex)),
    },
    Fonction {
        nom: "bin",
        arite: 1,
        aide: "affichage binaire",
        corps: |a| Ok(a[0].format_as(Notation::Binaire)),
    },
    Fonction {
        nom: "oct",
        arite: 1,
        aide: "affichage octal",
        corps: |a| Ok(a[0].format_as(Notation::Octal)),
    },
    Fonction {
        nom: "dec",
        arite: 1,
        aide: "affichage décimal",
        corps: |a| Ok(a[0].format_as(Notation::Decimal)),
    },
    /* ---- couleurs ---- */
    Fonction {
        nom: "rgb",
        arite: 3,
        aide: "empaquette (r, g, b) en 0xRRGGBB",
        corps: |a| Ok(couleur(couleurs::pack(&a[0].reel, &a[1].reel, &a[2].reel))),
    },
    Fonction {
        nom: "rgb444",
        arite: 1,
        aide: "0xRGB vers 0xRRGGBB",
        corps: |a| Ok(couleur(couleurs::rgb444(&a[0].reel)?)),
    },
    Fonction {
        nom: "hsv2rgb",
        arite: 3,
        aide: "(teinte, saturation, valeur) vers 0xRRGGBB",
        corps: |a| Ok(empaqueter(a, couleurs::hsv_vers_rgb)),
    },
    Fonction {
        nom: "hsv2rgb_r",
        arite: 3,
        aide: "rouge (non saturé) d’une couleur HSV",
        corps: |a| Ok(composante3(a, couleurs::hsv_vers_rgb, premier)),
    },
    Fonction {
        nom: "hsv2rgb_g",
        arite: 3,
        aide: "vert (non saturé) d’une couleur HSV",
        corps: |a| Ok(composante3(a, couleurs::hsv_vers_rgb, deuxieme)),
    },
    Fonction {
        nom: "hsv2rgb_b",
        arite: 3,
        aide: "bleu (non saturé) d’une couleur HSV",
        corps: |a| Ok(composante3(a, couleurs::hsv_vers_rgb, troisieme)),
    },
    Fonction {
        nom: "rgb2hsv_h",
        arite: 1,
        aide: "teinte HSV d’une couleur",
        corps: |a| composante(a, couleurs::rgb_vers_hsv, premier),
    },
    Fonction {
        nom: "rgb2hsv_s",
        arite: 1,
        aide: "saturation HSV d’une couleur",
        corps: |a| composante(a, couleurs::rgb_vers_hsv, deuxieme),
    },
    Fonction {
        nom: "rgb2hsv_v",
        arite: 1,
        aide: "valeur HSV d’une couleur",
        corps: |a| composante(a, couleurs::rgb_vers_hsv, troisieme),
    },
    Fonction {
        nom: "hsl2rgb",
        arite: 3,
        aide: "(teinte, saturation, luminosité) vers 0xRRGGBB",
        corps: |a| Ok(empaqueter(a, couleurs::hsl_vers_rgb)),
    },
    Fonction {
        nom: "hsl2rgb_r",
        arite: 3,
        aide: "rouge (non saturé) d’une couleur HSL",
        corps: |a| Ok(composante3(a, couleurs::hsl_vers_rgb, premier)),
    },
    Fonction {
        nom: "hsl2rgb_g",
        arite: 3,
        aide: "vert (non saturé) d’une couleur HSL",
        corps: |a| Ok(composante3(a, couleurs::hsl_vers_rgb, deuxieme)),
    },
    Fonction {
        nom: "hsl2rgb_b",
        arite: 3,
        aide: "bleu (non saturé) d’une couleur HSL",
        corps: |a| Ok(composante3(a, couleurs::hsl_vers_rgb, troisieme)),
    },
    Fonction {
        nom: "rgb2hsl_h",
        arite: 1,
        aide: "teinte HSL d’une couleur",
        corps: |a| composante(a, couleurs::rgb_vers_hsl, premier),
    },
    Fonction {
        nom: "rgb2hsl_s",
        arite: 1,
        aide: "saturation HSL d’une couleur",
        corps: |a| composante(a, couleurs::rgb_vers_hsl, deuxieme),
    },
    Fonction {
        nom: "rgb2hsl_l",
        arite: 1,
        aide: "luminosité HSL d’une couleur",
        corps: |a| composante(a, couleurs::rgb_vers_hsl, troisieme),
    },
    Fonction {
        nom: "rgb2yuv",
        arite: 1,
        aide: "0xRRGGBB vers 0xYYUUVV",
        corps: |a| reempaqueter(a, couleurs::rgb_vers_yuv),
    },
    Fonction {
        nom: "rgb2yuv",
        arite: 3,
        aide: "(r, g, b) vers 0xYYUUVV",
        corps: |a| Ok(empaqueter(a, couleurs::rgb_vers_yuv)),
    },
    Fonction {
        nom: "rgb2yuv_y",
        arite: 1,
        aide: "luma Y d’une couleur",
        corps: |a| composante(a, couleurs::rgb_vers_yuv, premier),
    },
    Fonction {
        nom: "rgb2yuv_u",
        arite: 1,
        aide: "chrominance U d’une couleur",
        corps: |a| composante(a, couleurs::rgb_vers_yuv, deuxieme),
    },
    Fonction {
        nom: "rgb2yuv_v",
        arite: 1,
        aide: "chrominance V d’une couleur",
        corps: |a| composante(a, couleurs::rgb_vers_yuv, troisieme),
    },
    Fonction {
        nom: "yuv2rgb",
        arite: 1,
        aide: "0xYYUUVV vers 0xRRGGBB",
        corps: |a| reempaqueter(a, couleurs::yuv_vers_rgb),
    },
    Fonction {
        nom: "yuv2rgb",
        arite: 3,
        aide: "(y, u, v) vers 0xRRGGBB",
        corps: |a| Ok(empaqueter(a, couleurs::yuv_vers_rgb)),
    },
    Fonction {
        nom: "yuv2rgb_r",
        arite: 1,
        aide: "rouge d’une couleur YUV",
        corps: |a| composante(a, couleurs::yuv_vers_rgb, premier),
    },
    Fonction {
        nom: "yuv2rgb_g",
        arite: 1,
        aide: "vert d’une couleur YUV",
        corps: |a| composante(a, couleurs::yuv_vers_rgb, deuxieme),
    },
    Fonction {
        nom: "yuv2rgb_b",
        arite: 1,
        aide: "bleu d’une couleur YUV",
        corps: |a| composante(a, couleurs::yuv_vers_rgb, troisieme),
    },
];

/// Fonction `nom` acceptant `arite` arguments.
/// - nom inconnu : FonctionIndefinie
/// - nom connu, aucune surcharge de cette arité : Arite (arité de la première entrée)
pub fn chercher(nom: &str, arite: usize) -> Result<&'static Fonction, ErreurEval> {
    let mut candidates = FONCTIONS.iter().filter(|f| f.nom == nom).peekable();
    let attendu = candidates
        .peek()
        .map(|f| f.arite)
        .ok_or_else(|| ErreurEval::FonctionIndefinie(nom.to_string()))?;

    candidates
        .find(|f| f.arite == arite)
        .ok_or_else(|| ErreurEval::Arite {
            nom: nom.to_string(),
            attendu,
            recu: arite,
        })
}

/// Appelle une fonction de la table (arguments déjà évalués).
#[cfg(test)]
pub fn appeler(nom: &str, args: &[Valeur]) -> Result<Valeur, ErreurEval> {
    let f = chercher(nom, args.len())?;
    (f.corps)(args)
}
