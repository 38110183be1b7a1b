// src/noyau/syntaxe.rs
//
// Parseur à descente récursive (une fonction par niveau de priorité).
// Priorités, de la plus faible à la plus forte :
//   ||   &&   == != < <= > >=   |   &   << >>   + -   * / % mod   ^ (droite)   unaires + - !
// Les unaires lient plus fort que `^` : -2^2 = (-2)^2 = 4.
// L’affectation `nom = expr` n’est acceptée qu’en tête de ligne.

use super::erreurs::ErreurAnalyse;
use super::expr::{Expr, OpBinaire, OpUnaire};
use super::jetons::{format_jetons, tokenize, GenreJeton, Jeton};

/// Garde-fou : imbrication maximale (parenthèses, unaires, puissances).
const PROFONDEUR_MAX: usize = 256;

/// Garde-fou : opérateurs binaires par ligne. Une chaîne `a+b+…` donne un arbre
/// dont la profondeur croît d’un niveau par opérateur (eval, Display et Drop récursifs).
const OPERATIONS_MAX: usize = 1024;

type Res = Result<Expr, ErreurAnalyse>;

/// Lexe puis analyse une ligne complète.
pub fn parse(texte: &str) -> Res {
    let jetons = tokenize(texte)?;
    tracing::trace!(jetons = %format_jetons(&jetons), "lexé");
    Parseur::new(jetons).ligne()
}

struct Parseur {
    jetons: Vec<Jeton>,
    i: usize,
    profondeur: usize,
    operations: usize,
}

impl Parseur {
    fn new(mut jetons: Vec<Jeton>) -> Self {
        if jetons.last().map(|j| j.genre) != Some(GenreJeton::Fin) {
            let pos = jetons.last().map(|j| j.pos + j.texte.len()).unwrap_or(0);
            jetons.push(Jeton {
                genre: GenreJeton::Fin,
                pos,
                texte: String::new(),
                indice: None,
            });
        }
        Self {
            jetons,
            i: 0,
            profondeur: 0,
            operations: 0,
        }
    }

    /* ------------------------ Curseur ------------------------ */

    fn courant(&self) -> &Jeton {
        // le dernier jeton (Fin) n’est jamais consommé
        &self.jetons[self.i.min(self.jetons.len() - 1)]
    }

    fn suivant(&self) -> &Jeton {
        &self.jetons[(self.i + 1).min(self.jetons.len() - 1)]
    }

    fn avancer(&mut self) {
        if self.i + 1 < self.jetons.len() {
            self.i += 1;
        }
    }

    fn voit(&self, genre: GenreJeton, texte: &str) -> bool {
        self.courant().est(genre, texte)
    }

    fn erreur(&self, attendu: &str) -> ErreurAnalyse {
        let j = self.courant();
        ErreurAnalyse::Syntaxe {
            pos: j.pos,
            attendu: attendu.to_string(),
            trouve: j.to_string(),
        }
    }

    fn attendre(&mut self, genre: GenreJeton, texte: &str) -> Result<(), ErreurAnalyse> {
        if !self.voit(genre, texte) {
            return Err(self.erreur(&format!("'{texte}'")));
        }
        self.avancer();
        Ok(())
    }

    fn imbrique(&mut self, f: fn(&mut Self) -> Res) -> Res {
        if self.profondeur >= PROFONDEUR_MAX {
            return Err(self.erreur("expression moins imbriquée"));
        }
        self.profondeur += 1;
        let r = f(self);
        self.profondeur -= 1;
        r
    }

    /* ------------------------ Grammaire ------------------------ */

    fn ligne(&mut self) -> Res {
        let e = if self.courant().genre == GenreJeton::Ident
            && self.suivant().est(GenreJeton::Operateur, "=")
        {
            let nom = self.courant().texte.clone();
            self.avancer();
            self.avancer();
            Expr::Affectation(nom, Box::new(self.expr()?))
        } else {
            self.expr()?
        };

        if self.courant().genre != GenreJeton::Fin {
            return Err(self.erreur("fin d'expression"));
        }
        Ok(e)
    }

    fn expr(&mut self) -> Res {
        self.ou()
    }

    /// Niveau binaire associatif à gauche.
    fn niveau(&mut self, ops: &[(&str, OpBinaire)], sous_niveau: fn(&mut Self) -> Res) -> Res {
        let mut g = sous_niveau(self)?;
        while let Some(op) = self.operateur_parmi(ops) {
            if self.operations >= OPERATIONS_MAX {
                return Err(self.erreur("expression plus courte"));
            }
            self.operations += 1;
            self.avancer();
            let d = sous_niveau(self)?;
            g = Expr::Binaire(op, Box::new(g), Box::new(d));
        }
        Ok(g)
    }

    fn operateur_parmi(&self, ops: &[(&str, OpBinaire)]) -> Option<OpBinaire> {
        let j = self.courant();
        // `mod` est lexé comme identifiant
        if !matches!(j.genre, GenreJeton::Operateur | GenreJeton::Ident) {
            return None;
        }
        ops.iter().find(|(t, _)| *t == j.texte).map(|(_, op)| *op)
    }

    fn ou(&mut self) -> Res {
        self.niveau(&[("||", OpBinaire::Ou)], Self::et)
    }

    fn et(&mut self) -> Res {
        self.niveau(&[("&&", OpBinaire::Et)], Self::comparaison)
    }

    fn comparaison(&mut self) -> Res {
        self.niveau(
            &[
                ("==", OpBinaire::Egal),
                ("!=", OpBinaire::Different),
                ("<", OpBinaire::Inferieur),
                ("<=", OpBinaire::InferieurEgal),
                (">", OpBinaire::Superieur),
                (">=", OpBinaire::SuperieurEgal),
            ],
            Self::bit_ou,
        )
    }

    fn bit_ou(&mut self) -> Res {
        self.niveau(&[("|", OpBinaire::BitOu)], Self::bit_et)
    }

    fn bit_et(&mut self) -> Res {
        self.niveau(&[("&", OpBinaire::BitEt)], Self::decalage)
    }

    fn decalage(&mut self) -> Res {
        self.niveau(
            &[
                ("<<", OpBinaire::DecalageGauche),
                (">>", OpBinaire::DecalageDroite),
            ],
            Self::additif,
        )
    }

    fn additif(&mut self) -> Res {
        self.niveau(
            &[("+", OpBinaire::Plus), ("-", OpBinaire::Moins)],
            Self::multiplicatif,
        )
    }

    fn multiplicatif(&mut self) -> Res {
        self.niveau(
            &[
                ("*", OpBinaire::Fois),
                ("/", OpBinaire::Divise),
                ("%", OpBinaire::Modulo),
                ("mod", OpBinaire::Modulo),
            ],
            Self::puissance,
        )
    }

    /// unaire ('^' puissance)? ; associatif à droite
    fn puissance(&mut self) -> Res {
        let base = self.unaire()?;
        if !self.voit(GenreJeton::Operateur, "^") {
            return Ok(base);
        }
        self.avancer();
        let exposant = self.imbrique(Self::puissance)?;
        Ok(Expr::Binaire(
            OpBinaire::Puissance,
            Box::new(base),
            Box::new(exposant),
        ))
    }

    fn unaire(&mut self) -> Res {
        let op = [
            ("+", OpUnaire::Plus),
            ("-", OpUnaire::Moins),
            ("!", OpUnaire::Non),
        ]
        .into_iter()
        .find(|(t, _)| self.voit(GenreJeton::Operateur, t))
        .map(|(_, op)| op);

        let Some(op) = op else {
            return self.primaire();
        };
        self.avancer();
        let x = self.imbrique(Self::unaire)?;
        Ok(Expr::Unaire(op, Box::new(x)))
    }

    fn primaire(&mut self) -> Res {
        let j = self.courant().clone();
        match j.genre {
            GenreJeton::Nombre => {
                let indice = j.indice.ok_or_else(|| self.erreur("nombre"))?;
                self.avancer();
                Ok(Expr::Litteral(indice.valeur))
            }

            GenreJeton::Ident => {
                self.avancer();
                if !self.voit(GenreJeton::Ponctuation, "(") {
                    return Ok(Expr::Variable(j.texte));
                }
                self.avancer();
                let args = self.arguments()?;
                Ok(Expr::Appel(j.texte, args))
            }

            GenreJeton::Ponctuation if j.texte == "(" => {
                self.avancer();
                let e = self.imbrique(Self::expr)?;
                self.attendre(GenreJeton::Ponctuation, ")")?;
                Ok(e)
            }

            _ => Err(self.erreur("expression")),
        }
    }

    /// Après '(' : liste vide `)` ou expr (',' expr)* `)`.
    fn arguments(&mut self) -> Result<Vec<Expr>, ErreurAnalyse> {
        let mut args = Vec::new();
        if self.voit(GenreJeton::Ponctuation, ")") {
            self.avancer();
            return Ok(args);
        }
        loop {
            args.push(self.imbrique(Self::expr)?);
            if self.voit(GenreJeton::Ponctuation, ",") {
                self.avancer();
                continue;
            }
            self.attendre(GenreJeton::Ponctuation, ")")?;
            return Ok(args);
        }
    }
}
