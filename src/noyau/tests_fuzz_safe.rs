//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline ligne par ligne sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - invariants : jamais de panique ; Ans indéfini après un échec, défini après un succès ;
//!   deux passes identiques donnent les mêmes réponses

use std::time::{Duration, Instant};

use super::contexte::{Contexte, ANS};
use super::erreurs::{Erreur, ErreurEval};
use super::eval::{evaluer_ligne, recalculer, ModeRadix, Resultat};
use super::reglages::Reglages;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn choisir<'a>(&mut self, options: &[&'a str]) -> &'a str {
        options[self.pick(options.len() as u32) as usize]
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

fn gen_atom(rng: &mut Rng) -> String {
    match rng.pick(7) {
        0 => rng.pick(10).to_string(),
        1 => format!("0x{:X}", rng.pick(0x1_0000)),
        2 => format!("0b{:b}", rng.pick(64)),
        3 => format!("{}.{}", rng.pick(100), rng.pick(1000)),
        4 => rng.choisir(&["PI", "E"]).to_string(),
        5 => format!("{}e{}", rng.pick(9) + 1, rng.pick(30) as i32 - 15),
        _ => "0".to_string(),
    }
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_atom(rng);
    }

    match rng.pick(8) {
        0 => gen_atom(rng),
        1..=3 => {
            let op = rng.choisir(&[
                "+", "-", "*", "/", "%", " mod ", "&", "|", "<<", ">>", "==", "!=", "<", "<=",
                ">", ">=", "&&", "||",
            ]);
            format!(
                "({}{op}{})",
                gen_expr(rng, depth - 1),
                gen_expr(rng, depth - 1)
            )
        }
        4 => {
            let op = rng.choisir(&["-", "+", "!"]);
            format!("{op}{}", gen_expr(rng, depth - 1))
        }
        // exposants petits : la taille des entiers reste bornée
        5 if rng.pick(2) == 0 => {
            format!("({}^{})", gen_expr(rng, depth - 1), rng.pick(9) as i32 - 4)
        }
        5 => {
            let f = rng.choisir(&["abs", "sign", "round", "floor", "sqrt", "hex", "rgb2hsv_h", "yuv2rgb"]);
            format!("{f}({})", gen_expr(rng, depth - 1))
        }
        6 => {
            let f = rng.choisir(&["min", "max"]);
            format!("{f}({}, {})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1))
        }
        _ => {
            let f = rng.choisir(&["rgb", "hsv2rgb", "hsl2rgb", "rgb2yuv", "clamp"]);
            format!(
                "{f}({}, {}, {})",
                gen_expr(rng, depth - 1),
                gen_expr(rng, depth - 1),
                gen_expr(rng, depth - 1)
            )
        }
    }
}

/// Bruit textuel : une ligne mal formée ne doit jamais faire paniquer.
fn gen_bruit(rng: &mut Rng) -> String {
    const ALPHABET: &[u8] = b"0123456789xXbo.eE_+-*/%^&|<>!=(),abcPI $#";
    let n = rng.pick(24) as usize;
    (0..n)
        .map(|_| ALPHABET[rng.pick(ALPHABET.len() as u32) as usize] as char)
        .collect()
}

/// Les variables n’apparaissent qu’en tête, une fois par ligne :
/// une réinjection répétée de `Ans` ne fait croître les valeurs que linéairement.
fn gen_ligne(rng: &mut Rng) -> String {
    match rng.pick(10) {
        0 => gen_bruit(rng),
        1 => format!("x = {}", gen_expr(rng, 3)),
        2 => format!("y = {}", gen_expr(rng, 2)),
        3 | 4 => {
            let var = rng.choisir(&["Ans", "x", "y"]);
            let op = rng.choisir(&["+", "-", "*", "/", "==", "&&"]);
            format!("{var} {op} {}", gen_expr(rng, 2))
        }
        _ => gen_expr(rng, 4),
    }
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_invariant_ans() {
    let t0 = Instant::now();
    let max = Duration::from_secs(10);

    let mut rng = Rng::new(0xC0FFEE_u64);
    let mut ctx = Contexte::default();

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..300 {
        budget(t0, max);

        let ligne = gen_ligne(&mut rng);
        match evaluer_ligne(&ligne, ModeRadix::Auto, &mut ctx) {
            Ok(reponse) => {
                assert!(!reponse.is_empty(), "réponse vide pour {ligne:?}");
                assert!(ctx.est_defini(ANS), "Ans absent après succès: {ligne:?}");
                seen_ok += 1;
            }
            Err(e) => {
                assert!(!ctx.est_defini(ANS), "Ans présent après échec: {ligne:?} ({e})");
                assert!(!e.to_string().is_empty());
                seen_err += 1;
            }
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(seen_ok > 30, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 10, "trop peu d’erreurs: {seen_err}");
}

#[test]
fn fuzz_safe_determinisme_des_passes() {
    let t0 = Instant::now();
    let max = Duration::from_secs(10);

    let mut rng = Rng::new(0xBADC0DE_u64);
    let lignes: Vec<(String, ModeRadix)> = (0..80)
        .map(|_| {
            let mode = ModeRadix::TOUS[rng.pick(5) as usize];
            (gen_ligne(&mut rng), mode)
        })
        .collect();

    let a = recalculer(&lignes, &Reglages::default());
    budget(t0, max);
    let b = recalculer(&lignes, &Reglages::default());
    budget(t0, max);

    assert_eq!(a.len(), lignes.len());
    assert_eq!(a, b);
}

#[test]
fn fuzz_safe_bruit_sans_panique() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let mut rng = Rng::new(0x5AFE_u64);
    let mut ctx = Contexte::default();
    for _ in 0..500 {
        budget(t0, max);
        let ligne = gen_bruit(&mut rng);
        let _ = evaluer_ligne(&ligne, ModeRadix::Hex, &mut ctx);
    }
}

#[test]
fn fuzz_safe_somme_longue() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let expr = vec!["0.5"; 800].join("+");
    let r = recalculer(&[(expr.as_str(), ModeRadix::Auto)], &Reglages::default());
    budget(t0, max);

    assert_eq!(r, vec![Resultat::Valeur("400".into())]);
}

#[test]
fn fuzz_safe_somme_trop_longue() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let lignes = [
        (vec!["1"; 20_000].join("+"), ModeRadix::Auto),
        (vec!["2"; 200_000].join("*"), ModeRadix::Hex),
        ("Ans".to_string(), ModeRadix::Auto),
    ];
    let r = recalculer(&lignes, &Reglages::default());
    budget(t0, max);

    assert!(matches!(r[0], Resultat::Erreur(Erreur::Analyse(_))), "{:?}", r[0]);
    assert!(matches!(r[1], Resultat::Erreur(Erreur::Analyse(_))), "{:?}", r[1]);
    assert_eq!(
        r[2],
        Resultat::Erreur(Erreur::Eval(ErreurEval::VariableIndefinie("Ans".into())))
    );
}

#[test]
fn fuzz_safe_gardes_fous() {
    let mut ctx = Contexte::default();
    let trop = |ctx: &mut Contexte, s: &str| {
        matches!(
            evaluer_ligne(s, ModeRadix::Auto, ctx),
            Err(Erreur::Eval(ErreurEval::Evaluation(_)))
        )
    };
    assert!(trop(&mut ctx, "2^5000"));
    assert!(trop(&mut ctx, "1 << 2000"));
    assert!(trop(&mut ctx, "2^0.5"));
    assert!(trop(&mut ctx, "(2^4096)^4096"));
    assert!(trop(&mut ctx, "1e4096 * 1e4096 * 1e4096"));
    assert!(evaluer_ligne("1e5000", ModeRadix::Auto, &mut ctx).is_err());
    assert!(evaluer_ligne(&"(".repeat(5000), ModeRadix::Auto, &mut ctx).is_err());
}
