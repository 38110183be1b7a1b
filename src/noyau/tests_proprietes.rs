//! Tests de propriétés : le comportement observable du noyau, ligne par ligne.
//!
//! - aller-retour des littéraux (lecture puis rendu = texte canonique)
//! - saturation et aller-retour des couleurs
//! - division / modulo
//! - seuils scientifiques
//! - enchaînement de `Ans` et affectations dans une même passe

use super::biblio::appeler;
use super::contexte::{Contexte, ANS};
use super::couleurs::{hsv_vers_rgb, pack, rgb_vers_hsv, sat};
use super::erreurs::{Erreur, ErreurEval};
use super::eval::{evaluer_ligne, ModeRadix};
use super::notation::RECONNAISSEURS;
use super::reel::Reel;
use super::reglages::Reglages;
use super::valeur::Valeur;

fn evalue(ctx: &mut Contexte, texte: &str) -> Result<String, Erreur> {
    evaluer_ligne(texte, ModeRadix::Auto, ctx)
}

/* ------------------------ Littéraux ------------------------ */

#[test]
fn prop_aller_retour_litteraux() {
    let ctx = Contexte::default();
    let canoniques = [
        "0x1F", "0xFF", "0x1_0000", "0b101", "0b1111_0000", "0o7", "0o777_777", "7", "0.5",
        "1234.5678",
    ];
    for texte in canoniques {
        let mut ctx_eval = Contexte::default();
        assert_eq!(evalue(&mut ctx_eval, texte).unwrap(), texte, "ligne {texte:?}");

        // chaque canonique est reconnu par un reconnaisseur qui sait le réécrire
        let r = RECONNAISSEURS
            .iter()
            .find(|r| r.correspondance(texte).is_some())
            .unwrap_or_else(|| panic!("non reconnu : {texte:?}"));
        let (_, capture) = r.correspondance(texte).unwrap();
        let v = r.parse(capture).unwrap();
        assert_eq!(r.formater(&v, &ctx.reglages), texte);
    }
}

#[test]
fn prop_forme_non_canonique_normalisee() {
    let mut ctx = Contexte::default();
    assert_eq!(evalue(&mut ctx, "0x1f").unwrap(), "0x1F");
    assert_eq!(evalue(&mut ctx, "0xffffff").unwrap(), "0xFF_FFFF");
    assert_eq!(evalue(&mut ctx, "1_000").unwrap(), "1000");
    assert_eq!(evalue(&mut ctx, ".50").unwrap(), "0.5");
}

/* ------------------------ Couleurs ------------------------ */

#[test]
fn prop_saturation_pack() {
    let r = |n: i64| Reel::from(n);
    assert_eq!(pack(&r(-10), &r(300), &r(128)), pack(&r(0), &r(255), &r(128)));
    assert_eq!(pack(&r(-1000), &r(-1), &r(256)), pack(&r(0), &r(0), &r(255)));

    let mut ctx = Contexte::default();
    assert_eq!(evalue(&mut ctx, "rgb(-10, 300, 128)").unwrap(), "0xFF80");
    assert_eq!(
        evalue(&mut ctx, "rgb(-10, 300, 128) == rgb(0, 255, 128)").unwrap(),
        "1"
    );
}

/// LCG déterministe (même graine => mêmes triplets).
struct Lcg(u64);

impl Lcg {
    fn canal(&mut self) -> i64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 33) % 256) as i64
    }
}

#[test]
fn prop_aller_retour_hsv_tolerance_un() {
    let mut triplets: Vec<(i64, i64, i64)> = vec![
        (0, 0, 0),
        (255, 255, 255),
        (255, 0, 0),
        (0, 255, 0),
        (0, 0, 255),
        (1, 2, 3),
        (254, 255, 253),
        (128, 128, 127),
    ];
    let mut rng = Lcg(0x5EED);
    for _ in 0..400 {
        triplets.push((rng.canal(), rng.canal(), rng.canal()));
    }

    for (a, b, c) in triplets {
        let (h, s, v) = rgb_vers_hsv(&Reel::from(a), &Reel::from(b), &Reel::from(c));
        let (x, y, z) = hsv_vers_rgb(&h, &s, &v);
        let obtenu = [sat(&x), sat(&y), sat(&z)];
        for (o, attendu) in obtenu.iter().zip([a, b, c]) {
            assert!(
                (i64::from(*o) - attendu).abs() <= 1,
                "({a},{b},{c}) -> {obtenu:?}"
            );
        }
    }
}

#[test]
fn prop_teinte_achromatique() {
    let (h, s, v) = rgb_vers_hsv(&Reel::zero(), &Reel::zero(), &Reel::zero());
    assert_eq!((h, s, v), (Reel::zero(), Reel::zero(), Reel::zero()));

    let noir = Valeur::from(Reel::zero());
    for f in ["rgb2hsv_h", "rgb2hsv_s", "rgb2hsv_v"] {
        assert_eq!(appeler(f, std::slice::from_ref(&noir)).unwrap().reel, Reel::zero(), "{f}");
    }
}

/* ------------------------ Division / modulo ------------------------ */

#[test]
fn prop_division_par_zero_sans_panique() {
    let mut ctx = Contexte::default();
    assert_eq!(
        evalue(&mut ctx, "3 / 0"),
        Err(Erreur::Eval(ErreurEval::DivisionParZero))
    );
    assert_eq!(
        evalue(&mut ctx, "3 mod 0"),
        Err(Erreur::Eval(ErreurEval::DivisionParZero))
    );
}

#[test]
fn prop_modulo_signe_du_dividende() {
    let mut ctx = Contexte::default();
    let cas = [
        ("7 mod 3", "1"),
        ("-7 mod 3", "-1"),
        ("7 mod -3", "1"),
        ("-7 mod -3", "-1"),
        ("6 mod 3", "0"),
        ("7.5 mod 2", "1.5"),
        ("-7.5 mod 2", "-1.5"),
    ];
    for (texte, attendu) in cas {
        assert_eq!(evalue(&mut ctx, texte).unwrap(), attendu, "{texte}");
    }
}

/* ------------------------ Seuils scientifiques ------------------------ */

#[test]
fn prop_seuils_scientifiques() {
    let reglages = Reglages {
        scientifique: true,
        exposant_positif_min: 6,
        exposant_negatif_max: 4,
        ..Reglages::default()
    };
    let mut ctx = Contexte::new(reglages);
    assert_eq!(evalue(&mut ctx, "1e7").unwrap(), "1e7");
    assert_eq!(evalue(&mut ctx, "1e3").unwrap(), "1000");
    assert_eq!(evalue(&mut ctx, "1e-5").unwrap(), "1e-5");
    assert_eq!(evalue(&mut ctx, "1e-4").unwrap(), "0.0001");
}

/* ------------------------ Ans / affectation ------------------------ */

#[test]
fn prop_ans_enchaine() {
    let mut ctx = Contexte::default();
    assert_eq!(evalue(&mut ctx, "2+2").unwrap(), "4");
    assert_eq!(evalue(&mut ctx, "Ans*3").unwrap(), "12");

    assert!(evalue(&mut ctx, "1/0").is_err());
    assert_eq!(
        evalue(&mut ctx, "Ans + 1"),
        Err(Erreur::Eval(ErreurEval::VariableIndefinie(ANS.into())))
    );
}

#[test]
fn prop_affectation_persiste() {
    let mut ctx = Contexte::default();
    assert_eq!(evalue(&mut ctx, "x = 5").unwrap(), "5");
    assert_eq!(evalue(&mut ctx, "x+1").unwrap(), "6");
    assert!(evalue(&mut ctx, "nope").is_err());
    assert_eq!(evalue(&mut ctx, "x*x").unwrap(), "25");
}
