// src/noyau/expr.rs
//
// AST d’une ligne + évaluation récursive.
// - Litteral : valeur déjà lue (notation du littéral attachée)
// - Variable : lue dans le Contexte (variables puis constantes PI / E)
// - Affectation : seulement en tête de ligne (garanti par le parseur)
//
// Notation d’un résultat binaire arithmétique : celle de gauche sauf Auto, sinon celle de droite.
// Comparaisons et opérateurs logiques : 1 / 0 en notation Auto.

use num_bigint::BigInt;
use num_traits::ToPrimitive;
use std::fmt;

use super::biblio;
use super::contexte::Contexte;
use super::erreurs::ErreurEval;
use super::reel::Reel;
use super::reglages::Reglages;
use super::valeur::Valeur;

/// Décalage maximal accepté pour `<<` / `>>`.
const DECALAGE_MAX: usize = 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpUnaire {
    Plus,
    Moins,
    Non,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpBinaire {
    Ou,
    Et,
    Egal,
    Different,
    Inferieur,
    InferieurEgal,
    Superieur,
    SuperieurEgal,
    BitOu,
    BitEt,
    DecalageGauche,
    DecalageDroite,
    Plus,
    Moins,
    Fois,
    Divise,
    Modulo,
    Puissance,
}

impl OpUnaire {
    pub fn symbole(self) -> &'static str {
        match self {
            OpUnaire::Plus => "+",
            OpUnaire::Moins => "-",
            OpUnaire::Non => "!",
        }
    }
}

impl OpBinaire {
    pub fn symbole(self) -> &'static str {
        use OpBinaire::*;
        match self {
            Ou => "||",
            Et => "&&",
            Egal => "==",
            Different => "!=",
            Inferieur => "<",
            InferieurEgal => "<=",
            Superieur => ">",
            SuperieurEgal => ">=",
            BitOu => "|",
            BitEt => "&",
            DecalageGauche => "<<",
            DecalageDroite => ">>",
            Plus => "+",
            Moins => "-",
            Fois => "*",
            Divise => "/",
            Modulo => "%",
            Puissance => "^",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Litteral(Valeur),
    Variable(String),
    Unaire(OpUnaire, Box<Expr>),
    Binaire(OpBinaire, Box<Expr>, Box<Expr>),
    Appel(String, Vec<Expr>),
    Affectation(String, Box<Expr>),
}

impl Expr {
    pub fn eval(&self, ctx: &mut Contexte) -> Result<Valeur, ErreurEval> {
        match self {
            Expr::Litteral(v) => Ok(v.clone()),

            Expr::Variable(nom) => ctx.lire(nom),

            Expr::Unaire(op, x) => {
                let v = x.eval(ctx)?;
                Ok(match op {
                    OpUnaire::Plus => v,
                    OpUnaire::Moins => v.avec_reel(-&v.reel),
                    OpUnaire::Non => Valeur::booleen(!v.est_vrai()),
                })
            }

            // court-circuit : le membre droit n’est évalué que si nécessaire
            Expr::Binaire(OpBinaire::Et, a, b) => {
                if !a.eval(ctx)?.est_vrai() {
                    return Ok(Valeur::booleen(false));
                }
                Ok(Valeur::booleen(b.eval(ctx)?.est_vrai()))
            }
            Expr::Binaire(OpBinaire::Ou, a, b) => {
                if a.eval(ctx)?.est_vrai() {
                    return Ok(Valeur::booleen(true));
                }
                Ok(Valeur::booleen(b.eval(ctx)?.est_vrai()))
            }

            Expr::Binaire(op, a, b) => {
                let g = a.eval(ctx)?;
                let d = b.eval(ctx)?;
                let v = appliquer(*op, &g, &d)?;
                v.reel.verifier_taille()?;
                Ok(v)
            }

            Expr::Appel(nom, args) => {
                let f = biblio::chercher(nom, args.len())?;
                let valeurs = args
                    .iter()
                    .map(|a| a.eval(ctx))
                    .collect::<Result<Vec<_>, _>>()?;
                let v = (f.corps)(&valeurs)?;
                v.reel.verifier_taille()?;
                Ok(v)
            }

            Expr::Affectation(nom, x) => {
                let v = x.eval(ctx)?;
                *ctx.reference(nom, true)? = v.clone();
                Ok(v)
            }
        }
    }
}

fn appliquer(op: OpBinaire, g: &Valeur, d: &Valeur) -> Result<Valeur, ErreurEval> {
    use OpBinaire::*;

    let (x, y) = (&g.reel, &d.reel);
    let resultat = |reel: Reel| Valeur::new(reel, Valeur::notation_combinee(g, d));

    match op {
        Egal => Ok(Valeur::booleen(x == y)),
        Different => Ok(Valeur::booleen(x != y)),
        Inferieur => Ok(Valeur::booleen(x < y)),
        InferieurEgal => Ok(Valeur::booleen(x <= y)),
        Superieur => Ok(Valeur::booleen(x > y)),
        SuperieurEgal => Ok(Valeur::booleen(x >= y)),

        Plus => Ok(resultat(x + y)),
        Moins => Ok(resultat(x - y)),
        Fois => Ok(resultat(x * y)),
        Divise => Ok(resultat(x.divise(y)?)),
        Modulo => Ok(resultat(x.reste(y)?)),
        Puissance => Ok(resultat(x.puissance(y)?)),

        // bit à bit : sur les parties entières (complément à deux infini)
        BitEt => Ok(resultat(Reel::from(x.partie_entiere() & y.partie_entiere()))),
        BitOu => Ok(resultat(Reel::from(x.partie_entiere() | y.partie_entiere()))),
        DecalageGauche => {
            let n = decalage(y)?;
            Ok(resultat(Reel::from(x.partie_entiere() << n)))
        }
        DecalageDroite => {
            let n = decalage(y)?;
            Ok(resultat(Reel::from(x.partie_entiere() >> n)))
        }

        // traités par court-circuit dans eval()
        Et => Ok(Valeur::booleen(g.est_vrai() && d.est_vrai())),
        Ou => Ok(Valeur::booleen(g.est_vrai() || d.est_vrai())),
    }
}

fn decalage(y: &Reel) -> Result<usize, ErreurEval> {
    let n: BigInt = y.partie_entiere();
    n.to_usize()
        .filter(|n| *n <= DECALAGE_MAX)
        .ok_or_else(|| ErreurEval::evaluation(format!("décalage hors plage : {y}")))
}

/* ------------------------ Affichage (parenthésé, traces / tests) ------------------------ */

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Litteral(v) => f.write_str(&v.notation.formater(&v.reel, &Reglages::default())),
            Expr::Variable(nom) => f.write_str(nom),
            Expr::Unaire(op, x) => write!(f, "({}{x})", op.symbole()),
            Expr::Binaire(op, a, b) => write!(f, "({a}{}{b})", op.symbole()),
            Expr::Appel(nom, args) => {
                write!(f, "{nom}(")?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{a}")?;
                }
                f.write_str(")")
            }
            Expr::Affectation(nom, x) => write!(f, "{nom} = {x}"),
        }
    }
}
