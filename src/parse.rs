// =============================================================================
// PARSE — La frontière texte : en-têtes, listes d'attributs, dépendances
// =============================================================================
//
// Le cœur ne manipule que des index résolus. Ce module transforme le texte
// saisi par l'utilisateur en structures du cœur.
//
// FORMAT DES DÉPENDANCES :
//   A,B->C; C->D
//   1,2 -> 3            (index 1-based dans l'ordre de l'en-tête)
//   A → B               (la flèche unicode et "-->" sont acceptées)
//
//   Séparateurs de dépendances : ';' et les retours à la ligne.
//
// RÉSOLUTION D'UN JETON :
//   1. nom littéral d'attribut (même "2" si une colonne s'appelle "2")
//   2. sinon entier → position 1-based, hors limites ⇒ InvalidIndex
//   3. sinon ⇒ UnknownAttribute
//
// TOLÉRANCE :
//   Une dépendance mal formée (pas exactement une flèche, côté vide) est
//   IGNORÉE, pas rejetée. Elle est rendue dans `ParsedFds::dropped` et
//   signalée dans les logs.
//
// =============================================================================

use std::sync::LazyLock;

use regex::Regex;

use crate::core::attribute::{AttrSet, Universe};
use crate::core::fd::{self, Fd};
use crate::core::schema::Decomposition;
use crate::error::{NormError, NormResult};

/// Toute variante de flèche (→, ->, -->, avec blancs autour).
static ARROW: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*(?:→|-+>)\s*").expect("regex de flèche"));

/// Blancs autour des virgules.
static COMMA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*,\s*").expect("regex de virgule"));

/// Séparateurs entre dépendances (ou entre tables).
static SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[;\r\n]+").expect("regex de séparateur"));

/// Le résultat du parsing d'une liste de dépendances.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFds {
    pub fds: Vec<Fd>,
    /// Les morceaux de texte ignorés car mal formés.
    pub dropped: Vec<String>,
}

/// Normalise flèches et virgules : `A , B→C` devient `A,B->C`.
pub fn normalize_fd_text(text: &str) -> String {
    let arrows = ARROW.replace_all(text, "->");
    COMMA.replace_all(&arrows, ",").into_owned()
}

/// Découpe sur ';' et retours à la ligne, sans morceaux vides.
fn split_items(text: &str) -> impl Iterator<Item = &str> {
    SEPARATOR
        .split(text)
        .map(str::trim)
        .filter(|item| !item.is_empty())
}

/// Résout un jeton : nom littéral d'abord, puis position 1-based.
pub fn resolve_token(token: &str, universe: &Universe) -> NormResult<usize> {
    if let Some(index) = universe.index_of(token) {
        return Ok(index);
    }
    // Une position ne contient que des chiffres ASCII ("+2" n'en est pas une).
    let position = token
        .bytes()
        .all(|b| b.is_ascii_digit())
        .then(|| token.parse::<usize>().ok())
        .flatten();
    match position {
        Some(position) => universe.resolve_position(position),
        None => Err(NormError::UnknownAttribute {
            name: token.to_string(),
        }),
    }
}

/// Résout une liste `A,B` ou `1,2` en ensemble. Les jetons vides sont ignorés.
pub fn parse_attr_list(text: &str, universe: &Universe) -> NormResult<AttrSet> {
    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| resolve_token(token, universe))
        .collect()
}

/// Parse une liste de dépendances.
///
/// Une erreur de résolution (index ou nom) interrompt le parsing ; une
/// dépendance mal formée est seulement ignorée.
pub fn parse_fd_list(text: &str, universe: &Universe) -> NormResult<ParsedFds> {
    let normalized = normalize_fd_text(text);
    let mut parsed = ParsedFds::default();

    for item in split_items(&normalized) {
        let sides: Vec<&str> = item.split("->").collect();
        if sides.len() != 2 {
            parsed.dropped.push(item.to_string());
            continue;
        }

        let lhs = parse_attr_list(sides[0], universe)?;
        let rhs = parse_attr_list(sides[1], universe)?;
        if lhs.is_empty() || rhs.is_empty() {
            parsed.dropped.push(item.to_string());
            continue;
        }
        parsed.fds.push(Fd::new(lhs, rhs));
    }

    for item in &parsed.dropped {
        log::warn!("dépendance mal formée ignorée : '{}'", item);
    }
    parsed.fds = fd::dedup(parsed.fds);
    Ok(parsed)
}

/// Construit l'univers depuis une ligne d'en-tête `A,B,C`.
pub fn parse_header(text: &str) -> NormResult<Universe> {
    let names: Vec<&str> = text
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect();
    Universe::from_names(names)
}

/// Parse une décomposition `A,B; B,C` (une table par morceau).
pub fn parse_decomposition(text: &str, universe: &Universe) -> NormResult<Decomposition> {
    let sets = split_items(text)
        .map(|item| parse_attr_list(item, universe))
        .collect::<NormResult<Vec<_>>>()?;
    if sets.is_empty() {
        return Err(NormError::EmptyDecomposition);
    }
    Ok(Decomposition::from_sets(sets))
}
