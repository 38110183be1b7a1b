// src/noyau/reel.rs
//
// Réel décimal exact à échelle fixe.
// - mantisse : BigInt “scalé” (×10^ECHELLE)
// - aucun flottant binaire : les seuils d’affichage (longueur décimale, notation
//   scientifique) supposent une sémantique décimale exacte
// - arrondi : au pair le plus proche (banquier) à chaque étape inexacte
//
// Les constantes π et e sont calculées une fois (OnceLock), comme l’ancien cache π.

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::sync::OnceLock;

use super::erreurs::ErreurEval;

/// Nombre de chiffres fractionnaires conservés.
pub const ECHELLE: usize = 30;

/// Garde-fou : exposant décimal maximal accepté à la lecture d’un littéral.
const EXPOSANT_LITTERAL_MAX: i64 = 4096;

/// Garde-fou : exposant entier maximal pour `^` / pow().
const PUISSANCE_MAX: i64 = 4096;

/// Garde-fou : taille maximale (bits) de la partie entière d’un résultat, ≈ 12 000 chiffres.
const BITS_ENTIERS_MAX: u64 = 40_000;
const CHIFFRES_ENTIERS_MAX: i64 = 12_100;

/* ------------------------ Outils entiers scalés ------------------------ */

pub(crate) fn pow10(n: usize) -> BigInt {
    BigInt::from(10).pow(n as u32)
}

/// 10^ECHELLE (calculé une fois).
fn unite() -> &'static BigInt {
    static UNITE: OnceLock<BigInt> = OnceLock::new();
    UNITE.get_or_init(|| pow10(ECHELLE))
}

/// n / d arrondi au pair le plus proche (d ≠ 0).
pub(crate) fn div_arrondi(n: &BigInt, d: &BigInt) -> BigInt {
    let (q, r) = n.div_rem(d);
    if r.is_zero() {
        return q;
    }

    let pas = if n.is_negative() != d.is_negative() {
        -BigInt::one()
    } else {
        BigInt::one()
    };

    match (r.abs() * 2u32).cmp(&d.abs()) {
        Ordering::Less => q,
        Ordering::Greater => q + pas,
        Ordering::Equal => {
            if q.is_even() {
                q
            } else {
                q + pas
            }
        }
    }
}

/// Convertit un entier “scalé” (×10^chiffres) en texte décimal, zéros finaux retirés.
pub(crate) fn texte_echelonne(q: &BigInt, chiffres: usize) -> String {
    let neg = q.is_negative();
    let abs = q.abs();

    let scale = pow10(chiffres);
    let int_part = &abs / &scale;
    let frac_part = &abs % &scale;

    let signe = if neg { "-" } else { "" };

    if chiffres == 0 || frac_part.is_zero() {
        return format!("{signe}{int_part}");
    }

    let mut frac = frac_part.to_str_radix(10);
    while frac.len() < chiffres {
        frac.insert(0, '0');
    }
    let frac = frac.trim_end_matches('0');

    format!("{signe}{int_part}.{frac}")
}

/* ------------------------ Type Reel ------------------------ */

#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Reel {
    mantisse: BigInt,
}

impl Reel {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn un() -> Self {
        Self {
            mantisse: unite().clone(),
        }
    }

    pub(crate) fn mantisse(&self) -> &BigInt {
        &self.mantisse
    }

    /// Fraction exacte n/d arrondie à l’échelle (d ≠ 0).
    pub fn depuis_fraction(n: i64, d: i64) -> Self {
        Self::depuis_rationnel(&BigRational::new(BigInt::from(n), BigInt::from(d)))
    }

    pub fn depuis_rationnel(r: &BigRational) -> Self {
        Self {
            mantisse: div_arrondi(&(r.numer() * unite()), r.denom()),
        }
    }

    /// Lecture d’un littéral décimal : `123`, `1.5`, `.5`, `1e7`, `2.5E-3`, `1_000`.
    /// Retourne None si le texte est mal formé ou hors plage.
    pub fn parse(texte: &str) -> Option<Reel> {
        let t: String = texte.chars().filter(|c| *c != '_').collect();

        let (corps, exposant) = match t.find(|c| c == 'e' || c == 'E') {
            Some(k) => (&t[..k], t[k + 1..].parse::<i64>().ok()?),
            None => (t.as_str(), 0),
        };
        if exposant.abs() > EXPOSANT_LITTERAL_MAX {
            return None;
        }

        let (entier, frac) = match corps.find('.') {
            Some(k) => (&corps[..k], &corps[k + 1..]),
            None => (corps, ""),
        };
        if entier.is_empty() && frac.is_empty() {
            return None;
        }
        if !entier.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
            return None;
        }

        // rejet précoce avant tout calcul : trop de chiffres avant la virgule
        if entier.trim_start_matches('0').len() as i64 + exposant > CHIFFRES_ENTIERS_MAX {
            return None;
        }

        let chiffres = format!("{entier}{frac}");
        let n = BigInt::parse_bytes(chiffres.as_bytes(), 10)?;

        let decalage = exposant - frac.len() as i64;
        let r = if decalage >= 0 {
            BigRational::from_integer(n * pow10(decalage as usize))
        } else {
            BigRational::new(n, pow10((-decalage) as usize))
        };
        let x = Reel::depuis_rationnel(&r);
        x.verifier_taille().ok().map(|_| x)
    }

    /// Lecture d’un entier en base 2/8/16 (séparateurs `_` ignorés).
    pub fn parse_radix(chiffres: &str, base: u32) -> Option<Reel> {
        let t: String = chiffres.chars().filter(|c| *c != '_').collect();
        let x = Reel::from(BigInt::parse_bytes(t.as_bytes(), base)?);
        x.verifier_taille().ok().map(|_| x)
    }

    /// Partie entière d’au plus BITS_ENTIERS_MAX bits, sinon erreur d’évaluation.
    pub fn verifier_taille(&self) -> Result<(), ErreurEval> {
        if self.mantisse.bits() > BITS_ENTIERS_MAX + unite().bits() {
            return Err(ErreurEval::evaluation("résultat trop grand"));
        }
        Ok(())
    }

    /* ------------------------ Prédicats ------------------------ */

    pub fn is_zero(&self) -> bool {
        self.mantisse.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.mantisse.is_negative()
    }

    pub fn est_entier(&self) -> bool {
        (&self.mantisse % unite()).is_zero()
    }

    /// floor(log10(|x|)), None pour zéro.
    pub fn exposant10(&self) -> Option<i64> {
        if self.is_zero() {
            return None;
        }
        let longueur = self.mantisse.abs().to_str_radix(10).len() as i64;
        Some(longueur - 1 - ECHELLE as i64)
    }

    /* ------------------------ Arithmétique ------------------------ */

    pub fn divise(&self, autre: &Reel) -> Result<Reel, ErreurEval> {
        if autre.is_zero() {
            return Err(ErreurEval::DivisionParZero);
        }
        Ok(Reel {
            mantisse: div_arrondi(&(&self.mantisse * unite()), &autre.mantisse),
        })
    }

    /// Reste tronqué : signe du résultat = signe du dividende, |reste| < |diviseur|.
    /// Exemple : -7 mod 3 = -1 ; 7 mod -3 = 1.
    pub fn reste(&self, autre: &Reel) -> Result<Reel, ErreurEval> {
        if autre.is_zero() {
            return Err(ErreurEval::DivisionParZero);
        }
        // les deux mantisses partagent la même échelle : le reste est exact
        Ok(Reel {
            mantisse: &self.mantisse % &autre.mantisse,
        })
    }

    pub fn abs(&self) -> Reel {
        Reel {
            mantisse: self.mantisse.abs(),
        }
    }

    /// -1, 0 ou 1.
    pub fn signe(&self) -> Reel {
        Reel::from(match self.mantisse.sign() {
            num_bigint::Sign::Minus => -1i32,
            num_bigint::Sign::NoSign => 0,
            num_bigint::Sign::Plus => 1,
        })
    }

    /// Arrondi à l’entier le plus proche, demi au pair (127.5 → 128, 128.5 → 128).
    pub fn arrondi(&self) -> Reel {
        Reel::from(div_arrondi(&self.mantisse, unite()))
    }

    pub fn plancher(&self) -> Reel {
        Reel::from(self.mantisse.div_floor(unite()))
    }

    pub fn plafond(&self) -> Reel {
        Reel::from(-((-&self.mantisse).div_floor(unite())))
    }

    /// Troncature vers zéro.
    pub fn tronque(&self) -> Reel {
        Reel::from(self.partie_entiere())
    }

    /// Partie entière (troncature vers zéro).
    pub fn partie_entiere(&self) -> BigInt {
        &self.mantisse / unite()
    }

    /// Troncature vers zéro puis saturation dans i64.
    pub fn vers_i64_sature(&self) -> i64 {
        let n = self.partie_entiere();
        n.to_i64().unwrap_or(if n.is_negative() { i64::MIN } else { i64::MAX })
    }

    /// Canal 8 bits : clamp(arrondi(x), 0, 255).
    pub fn canal_sature(&self) -> u8 {
        let n = div_arrondi(&self.mantisse, unite());
        if n.is_negative() {
            0
        } else {
            n.to_u8().unwrap_or(u8::MAX)
        }
    }

    /// x^n pour n entier (|n| ≤ PUISSANCE_MAX), par carrés successifs.
    pub fn puissance(&self, exposant: &Reel) -> Result<Reel, ErreurEval> {
        if !exposant.est_entier() {
            return Err(ErreurEval::evaluation("exposant non entier"));
        }
        let n = exposant.vers_i64_sature();
        if n.abs() > PUISSANCE_MAX {
            return Err(ErreurEval::evaluation("exposant trop grand"));
        }

        let mut e = n.unsigned_abs();

        let entier = self.partie_entiere().abs();
        if n < 0 {
            // |x|^n < 2^-200 : nul à l’échelle
            if entier.bits().saturating_sub(1).saturating_mul(e) > 200 {
                return Ok(Reel::zero());
            }
        } else if (entier + 1u32).bits().saturating_mul(e) > BITS_ENTIERS_MAX {
            // majorant : |x|^e < (⌊|x|⌋ + 1)^e
            return Err(ErreurEval::evaluation("résultat trop grand"));
        }

        let mut acc = Reel::un();
        let mut b = self.clone();
        while e > 0 {
            if (e & 1) == 1 {
                acc = &acc * &b;
            }
            e >>= 1;
            if e > 0 {
                b = &b * &b;
            }
        }

        let resultat = if n < 0 { Reel::un().divise(&acc)? } else { acc };
        resultat.verifier_taille()?;
        Ok(resultat)
    }

    /// √x, tronquée à l’échelle. x < 0 => erreur d’évaluation.
    pub fn racine_carree(&self) -> Result<Reel, ErreurEval> {
        if self.is_negative() {
            return Err(ErreurEval::evaluation("racine carrée d’un nombre négatif"));
        }
        // √(m/10^E)·10^E = √(m·10^E)
        Ok(Reel {
            mantisse: racine_entiere(&(&self.mantisse * unite())),
        })
    }

    /* ------------------------ Constantes ------------------------ */

    pub fn pi() -> Reel {
        static PI: OnceLock<Reel> = OnceLock::new();
        PI.get_or_init(|| Reel {
            mantisse: pi_scaled_compute(ECHELLE),
        })
        .clone()
    }

    pub fn e() -> Reel {
        static E: OnceLock<Reel> = OnceLock::new();
        E.get_or_init(|| Reel {
            mantisse: e_scaled_compute(ECHELLE),
        })
        .clone()
    }
}

/* ------------------------ Conversions ------------------------ */

impl From<BigInt> for Reel {
    fn from(n: BigInt) -> Self {
        Reel {
            mantisse: n * unite(),
        }
    }
}

impl From<i64> for Reel {
    fn from(n: i64) -> Self {
        Reel::from(BigInt::from(n))
    }
}

impl From<i32> for Reel {
    fn from(n: i32) -> Self {
        Reel::from(BigInt::from(n))
    }
}

impl From<u8> for Reel {
    fn from(n: u8) -> Self {
        Reel::from(BigInt::from(n))
    }
}

/* ------------------------ Opérateurs ------------------------ */

impl Add for &Reel {
    type Output = Reel;
    fn add(self, autre: &Reel) -> Reel {
        Reel {
            mantisse: &self.mantisse + &autre.mantisse,
        }
    }
}

impl Add for Reel {
    type Output = Reel;
    fn add(self, autre: Reel) -> Reel {
        &self + &autre
    }
}

impl Sub for &Reel {
    type Output = Reel;
    fn sub(self, autre: &Reel) -> Reel {
        Reel {
            mantisse: &self.mantisse - &autre.mantisse,
        }
    }
}

impl Sub for Reel {
    type Output = Reel;
    fn sub(self, autre: Reel) -> Reel {
        &self - &autre
    }
}

impl Mul for &Reel {
    type Output = Reel;
    fn mul(self, autre: &Reel) -> Reel {
        Reel {
            mantisse: div_arrondi(&(&self.mantisse * &autre.mantisse), unite()),
        }
    }
}

impl Mul for Reel {
    type Output = Reel;
    fn mul(self, autre: Reel) -> Reel {
        &self * &autre
    }
}

impl Neg for Reel {
    type Output = Reel;
    fn neg(self) -> Reel {
        Reel {
            mantisse: -self.mantisse,
        }
    }
}

impl Neg for &Reel {
    type Output = Reel;
    fn neg(self) -> Reel {
        Reel {
            mantisse: -&self.mantisse,
        }
    }
}

/// Pleine précision, sans notation scientifique (traces / débogage).
impl fmt::Display for Reel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&texte_echelonne(&self.mantisse, ECHELLE))
    }
}

/* ------------------------ √ entière (Newton) ------------------------ */

/// floor(√n) par Newton, départ au-dessus de la racine (suite décroissante).
fn racine_entiere(n: &BigInt) -> BigInt {
    if n.is_zero() {
        return BigInt::zero();
    }

    let chiffres = n.to_str_radix(10).len();
    let mut y = pow10(chiffres / 2 + 1);

    loop {
        let y_next = (&y + n / &y) >> 1;
        if y_next >= y {
            return y;
        }
        y = y_next;
    }
}

/* ------------------------ π (Machin) ------------------------ */

/// arctan(1/q) en entier scalé (troncature) via série:
/// atan(z) = z - z^3/3 + z^5/5 - ...
fn arctan_inv_q_scaled(q: i64, scale: &BigInt) -> BigInt {
    let q = BigInt::from(q);
    let q2 = &q * &q;

    let mut k: u64 = 0;
    let mut q_pow = q.clone();
    let mut sum = BigInt::zero();

    loop {
        let term = scale / (&q_pow * BigInt::from(2 * k + 1));
        if term.is_zero() {
            break;
        }

        if k % 2 == 0 {
            sum += &term;
        } else {
            sum -= &term;
        }

        q_pow *= &q2;
        k += 1;
    }

    sum
}

fn pi_scaled_compute(digits: usize) -> BigInt {
    // extra pour amortir les erreurs de troncature
    let extra = 10usize;
    let scale = pow10(digits + extra);

    // Machin : π = 16*atan(1/5) - 4*atan(1/239)
    let a = arctan_inv_q_scaled(5, &scale);
    let b = arctan_inv_q_scaled(239, &scale);

    let pi = BigInt::from(16) * a - BigInt::from(4) * b;
    div_arrondi(&pi, &pow10(extra))
}

/// e = Σ 1/k!
fn e_scaled_compute(digits: usize) -> BigInt {
    let extra = 10usize;
    let mut terme = pow10(digits + extra);
    let mut somme = BigInt::zero();
    let mut k: u32 = 1;

    while !terme.is_zero() {
        somme += &terme;
        terme /= k;
        k += 1;
    }

    div_arrondi(&somme, &pow10(extra))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(s: &str) -> Reel {
        Reel::parse(s).unwrap_or_else(|| panic!("littéral invalide: {s:?}"))
    }

    #[test]
    fn parse_formes_usuelles() {
        assert_eq!(r("12"), Reel::from(12));
        assert_eq!(r("1_000"), Reel::from(1000));
        assert_eq!(r("1.5").to_string(), "1.5");
        assert_eq!(r(".25").to_string(), "0.25");
        assert_eq!(r("1e7"), Reel::from(10_000_000));
        assert_eq!(r("2.5E-3").to_string(), "0.0025");
        assert_eq!(r("1e+2"), Reel::from(100));
    }

    #[test]
    fn parse_refuse_mal_forme() {
        assert!(Reel::parse("").is_none());
        assert!(Reel::parse(".").is_none());
        assert!(Reel::parse("1e").is_none());
        assert!(Reel::parse("1e99999").is_none());
        assert!(Reel::parse("1x").is_none());
    }

    #[test]
    fn taille_bornee() {
        assert!(Reel::parse("1e4096").is_some());
        assert!(Reel::parse(&"9".repeat(20_000)).is_none());
        assert!(Reel::parse_radix(&"F".repeat(20_000), 16).is_none());

        // majorant refusé sans calculer 2^(4096·4096)
        let grand = r("2").puissance(&r("4096")).unwrap();
        assert!(grand.verifier_taille().is_ok());
        assert_eq!(
            grand.puissance(&r("4096")),
            Err(ErreurEval::evaluation("résultat trop grand"))
        );
        assert!(r("1e4096").puissance(&r("3")).is_err());
        assert!(r("1.5").puissance(&r("4096")).is_ok());

        assert_eq!(r("0.5").puissance(&r("-20")), Ok(Reel::from(1_048_576)));

        // exposant négatif sur une grande base : résultat nul, pas d’erreur
        assert_eq!(grand.puissance(&r("-2")), Ok(Reel::zero()));
        assert_eq!(r("3").puissance(&r("-4096")), Ok(Reel::zero()));
        assert_eq!(r("2").puissance(&r("-1")), Ok(r("0.5")));
    }

    #[test]
    fn parse_radix() {
        assert_eq!(Reel::parse_radix("1F", 16), Some(Reel::from(31)));
        assert_eq!(Reel::parse_radix("1010_1010", 2), Some(Reel::from(170)));
        assert_eq!(Reel::parse_radix("17", 8), Some(Reel::from(15)));
    }

    #[test]
    fn arithmetique_exacte() {
        assert_eq!((r("0.1") + r("0.2")).to_string(), "0.3");
        assert_eq!((r("1.5") * r("4")).to_string(), "6");
        assert_eq!(r("10").divise(&r("4")).unwrap().to_string(), "2.5");
        assert_eq!((r("3") - r("5")).to_string(), "-2");
    }

    #[test]
    fn division_par_zero() {
        assert_eq!(r("3").divise(&Reel::zero()), Err(ErreurEval::DivisionParZero));
        assert_eq!(r("3").reste(&Reel::zero()), Err(ErreurEval::DivisionParZero));
    }

    #[test]
    fn reste_signe_du_dividende() {
        assert_eq!(r("7").reste(&r("3")).unwrap(), Reel::from(1));
        assert_eq!(r("-7").reste(&r("3")).unwrap(), Reel::from(-1));
        assert_eq!(r("7").reste(&r("-3")).unwrap(), Reel::from(1));
        assert_eq!(r("-7").reste(&r("-3")).unwrap(), Reel::from(-1));
        assert_eq!(r("5.5").reste(&r("2")).unwrap().to_string(), "1.5");
    }

    #[test]
    fn arrondi_au_pair() {
        assert_eq!(r("127.5").arrondi(), Reel::from(128));
        assert_eq!(r("128.5").arrondi(), Reel::from(128));
        assert_eq!(r("-2.5").arrondi(), Reel::from(-2));
        assert_eq!(r("2.51").arrondi(), Reel::from(3));
    }

    #[test]
    fn plancher_plafond_tronque() {
        assert_eq!(r("-1.5").plancher(), Reel::from(-2));
        assert_eq!(r("-1.5").plafond(), Reel::from(-1));
        assert_eq!(r("-1.5").tronque(), Reel::from(-1));
        assert_eq!(r("1.5").plafond(), Reel::from(2));
        assert_eq!(r("2").plafond(), Reel::from(2));
    }

    #[test]
    fn saturation_canal() {
        assert_eq!(r("-10").canal_sature(), 0);
        assert_eq!(r("300").canal_sature(), 255);
        assert_eq!(r("127.5").canal_sature(), 128);
        assert_eq!(r("12.4").canal_sature(), 12);
    }

    #[test]
    fn puissance_entiere() {
        assert_eq!(r("2").puissance(&r("10")).unwrap(), Reel::from(1024));
        assert_eq!(r("2").puissance(&r("-1")).unwrap().to_string(), "0.5");
        assert_eq!(r("0").puissance(&r("0")).unwrap(), Reel::un());
        assert_eq!(r("0").puissance(&r("-1")), Err(ErreurEval::DivisionParZero));
        assert!(r("2").puissance(&r("0.5")).is_err());
        assert!(r("2").puissance(&r("100000")).is_err());
    }

    #[test]
    fn racine_carree() {
        assert_eq!(r("4").racine_carree().unwrap(), Reel::from(2));
        assert!(r("2")
            .racine_carree()
            .unwrap()
            .to_string()
            .starts_with("1.41421356237309504880"));
        assert!(r("-1").racine_carree().is_err());
    }

    #[test]
    fn constantes() {
        assert!(Reel::pi().to_string().starts_with("3.14159265358979323846"));
        assert!(Reel::e().to_string().starts_with("2.71828182845904523536"));
    }

    #[test]
    fn exposant_decimal() {
        assert_eq!(Reel::zero().exposant10(), None);
        assert_eq!(r("1e7").exposant10(), Some(7));
        assert_eq!(r("999").exposant10(), Some(2));
        assert_eq!(r("-0.00012").exposant10(), Some(-4));
    }

    #[test]
    fn conversion_machine() {
        assert_eq!(r("-3.9").vers_i64_sature(), -3);
        assert_eq!(r("1e30").vers_i64_sature(), i64::MAX);
        assert_eq!(r("-1e30").vers_i64_sature(), i64::MIN);
    }

    #[test]
    fn texte_echelonne_retire_zeros() {
        assert_eq!(texte_echelonne(&BigInt::from(1500), 3), "1.5");
        assert_eq!(texte_echelonne(&BigInt::from(-25), 3), "-0.025");
        assert_eq!(texte_echelonne(&BigInt::from(2000), 3), "2");
    }
}
