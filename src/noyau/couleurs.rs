// src/noyau/couleurs.rs
//
// Espaces de couleur sur réels exacts.
// Une couleur est un réel ordinaire : entier 24 bits 0xRRGGBB (aucun type dédié).
// - pack   : sat(r)<<16 | sat(g)<<8 | sat(b), sat = clamp(arrondi au pair, 0, 255)
// - unpack : troncature entière puis extraction des octets (argument validé avant)
//
// Canaux : 0..255. Teinte : degrés [0,360). Saturation / valeur / luminosité : 0..100.

use super::erreurs::ErreurEval;
use super::reel::Reel;

pub type Canaux = (Reel, Reel, Reel);

const COULEUR_MAX: i64 = 0xFF_FFFF;
const RGB444_MAX: i64 = 0xFFF;

fn r(n: i64) -> Reel {
    Reel::from(n)
}

/// a / b quand b ≠ 0 est garanti par l’appelant.
fn quotient(a: &Reel, b: &Reel) -> Reel {
    a.divise(b).unwrap_or_default()
}

fn min3(a: &Reel, b: &Reel, c: &Reel) -> Reel {
    a.min(b).min(c).clone()
}

fn max3(a: &Reel, b: &Reel, c: &Reel) -> Reel {
    a.max(b).max(c).clone()
}

fn borne(x: &Reel, lo: &Reel, hi: &Reel) -> Reel {
    x.max(lo).min(hi).clone()
}

/* ------------------------ Packing ------------------------ */

pub fn sat(x: &Reel) -> u8 {
    x.canal_sature()
}

pub fn pack(rouge: &Reel, vert: &Reel, bleu: &Reel) -> Reel {
    let n = (i64::from(sat(rouge)) << 16) | (i64::from(sat(vert)) << 8) | i64::from(sat(bleu));
    r(n)
}

pub fn pack_canaux((a, b, c): &Canaux) -> Reel {
    pack(a, b, c)
}

/// Entier tronqué de `v`, refusé hors de [0, max].
fn entier_couleur(v: &Reel, max: i64) -> Result<i64, ErreurEval> {
    let n = v.vers_i64_sature();
    if !(0..=max).contains(&n) {
        return Err(ErreurEval::evaluation(format!("couleur invalide : {v}")));
    }
    Ok(n)
}

/// Octets (haut, milieu, bas) d’une couleur 24 bits.
pub fn unpack(v: &Reel) -> Result<Canaux, ErreurEval> {
    let n = entier_couleur(v, COULEUR_MAX)?;
    Ok((r((n >> 16) & 0xFF), r((n >> 8) & 0xFF), r(n & 0xFF)))
}

/// 0xRGB (12 bits) -> 0xRRGGBB : chaque quartet est dupliqué.
pub fn rgb444(v: &Reel) -> Result<Reel, ErreurEval> {
    let n = entier_couleur(v, RGB444_MAX)?;
    let etendre = |q: i64| r(q | (q << 4));
    Ok(pack(
        &etendre((n >> 8) & 0xF),
        &etendre((n >> 4) & 0xF),
        &etendre(n & 0xF),
    ))
}

/* ------------------------ Teinte ------------------------ */

/// Teinte selon le canal minimal (0 si achromatique).
pub fn teinte(rouge: &Reel, vert: &Reel, bleu: &Reel, min: &Reel, max: &Reel) -> Reel {
    if min == max {
        return Reel::zero();
    }
    let etendue = max - min;
    let (num, base) = if min == bleu {
        (vert - rouge, 60)
    } else if min == rouge {
        (bleu - vert, 180)
    } else {
        (rouge - bleu, 300)
    };
    quotient(&(&r(60) * &num), &etendue) + r(base)
}

/// Teinte ramenée dans [0, 360).
fn teinte_normalisee(h: &Reel) -> Reel {
    let reste = h.reste(&r(360)).unwrap_or_default();
    if reste.is_negative() {
        reste + r(360)
    } else {
        reste
    }
}

/// Partie fractionnaire de h/60 (h ≥ 0).
fn fraction_secteur(h: &Reel) -> Reel {
    let t = quotient(h, &r(60));
    &t - &t.plancher()
}

/// Répartit (a, b, c, d, e, f) selon les six secteurs de 60°, bornes semi-ouvertes.
fn secteur(h: &Reel) -> usize {
    let mut k = 0;
    while k < 5 && *h >= r(60 * (k as i64 + 1)) {
        k += 1;
    }
    k
}

/* ------------------------ HSV ------------------------ */

pub fn rgb_vers_hsv(rouge: &Reel, vert: &Reel, bleu: &Reel) -> Canaux {
    let min = min3(rouge, vert, bleu);
    let max = max3(rouge, vert, bleu);
    let h = teinte(rouge, vert, bleu, &min, &max);
    let s = if max.is_zero() {
        Reel::zero()
    } else {
        quotient(&(&r(100) * &(&max - &min)), &max)
    };
    let v = quotient(&(&max * &r(100)), &r(255));
    (h, s, v)
}

pub fn hsv_vers_rgb(h: &Reel, s: &Reel, v: &Reel) -> Canaux {
    let h = teinte_normalisee(h);
    let s = quotient(&borne(s, &Reel::zero(), &r(100)), &r(100));
    let v = quotient(&borne(v, &Reel::zero(), &r(100)), &r(100));

    let f = fraction_secteur(&h);
    let un = Reel::un();
    let c255 = r(255);

    let x = &v * &c255;
    let y = &(&v * &(&un - &s)) * &c255;
    let z = &(&v * &(&un - &(&s * &f))) * &c255;
    let w = &(&v * &(&un - &(&s * &(&un - &f)))) * &c255;

    if s.is_zero() {
        return (x.clone(), x.clone(), x);
    }
    match secteur(&h) {
        0 => (x, w, y),
        1 => (z, x, y),
        2 => (y, x, w),
        3 => (y, z, x),
        4 => (w, y, x),
        _ => (x, y, z),
    }
}

/* ------------------------ HSL ------------------------ */

pub fn rgb_vers_hsl(rouge: &Reel, vert: &Reel, bleu: &Reel) -> Canaux {
    let min = min3(rouge, vert, bleu);
    let max = max3(rouge, vert, bleu);
    let h = teinte(rouge, vert, bleu, &min, &max);

    let somme = &max + &min;
    let p = r(255) - (&somme - &r(255)).abs();
    let s = if p.is_zero() {
        Reel::zero()
    } else {
        quotient(&(&r(100) * &(&max - &min)), &p)
    };
    let l = quotient(&(&r(100) * &somme), &r(510));
    (h, s, l)
}

pub fn hsl_vers_rgb(h: &Reel, s: &Reel, l: &Reel) -> Canaux {
    let h = teinte_normalisee(h);
    let s = quotient(&borne(s, &Reel::zero(), &r(100)), &r(100));
    let l = quotient(&borne(l, &Reel::zero(), &r(100)), &r(100));

    let f = fraction_secteur(&h);
    let un = Reel::un();
    let c255 = r(255);

    // demi-chroma : s·(1 − |2l − 1|)/2
    let demi = quotient(&(&s * &(&un - &(&(&r(2) * &l) - &un).abs())), &r(2));
    let max = &c255 * &(&l + &demi);
    let min = &c255 * &(&l - &demi);
    let etendue = &max - &min;
    let x = &min + &(&etendue * &f);
    let y = &min + &(&etendue * &(&un - &f));

    if s.is_zero() {
        return (max.clone(), max.clone(), max);
    }
    match secteur(&h) {
        0 => (max, x, min),
        1 => (y, max, min),
        2 => (min, max, x),
        3 => (min, y, max),
        4 => (x, min, max),
        _ => (max, min, y),
    }
}

/* ------------------------ YUV (BT.601) ------------------------ */

fn coef(millioniemes: i64) -> Reel {
    Reel::depuis_fraction(millioniemes, 1_000_000)
}

fn combinaison(a: i64, x: &Reel, b: i64, y: &Reel, c: i64, z: &Reel) -> Reel {
    &(&(&coef(a) * x) + &(&coef(b) * y)) + &(&coef(c) * z)
}

pub fn rgb_vers_yuv(rouge: &Reel, vert: &Reel, bleu: &Reel) -> Canaux {
    let y = combinaison(257_000, rouge, 504_000, vert, 98_000, bleu) + r(16);
    let u = combinaison(-148_000, rouge, -291_000, vert, 439_000, bleu) + r(128);
    let v = combinaison(439_000, rouge, -368_000, vert, -71_000, bleu) + r(128);
    (y, u, v)
}

pub fn yuv_vers_rgb(y: &Reel, u: &Reel, v: &Reel) -> Canaux {
    let y = y - &r(16);
    let u = u - &r(128);
    let v = v - &r(128);
    let zero = Reel::zero();
    let rouge = combinaison(1_164_383, &y, 0, &zero, 1_596_027, &v);
    let vert = combinaison(1_164_383, &y, -391_762, &u, -812_968, &v);
    let bleu = combinaison(1_164_383, &y, 2_017_232, &u, 0, &zero);
    (rouge, vert, bleu)
}
