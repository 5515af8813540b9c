use crate::phi::{AggregateFn, PhiOperator, SpecError};

///
/// SpecKey
///
/// Keys recognized in the line-oriented Phi format.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum SpecKey {
    Select,
    GroupingVarCount,
    GroupingAttrs,
    Aggregates,
    Predicates,
    Having,
}

impl SpecKey {
    const ALL: [Self; 6] = [
        Self::Select,
        Self::GroupingVarCount,
        Self::GroupingAttrs,
        Self::Aggregates,
        Self::Predicates,
        Self::Having,
    ];

    const fn label(self) -> &'static str {
        match self {
            Self::Select => "S",
            Self::GroupingVarCount => "n",
            Self::GroupingAttrs => "V",
            Self::Aggregates => "F-VECT",
            Self::Predicates => "PRED-LIST",
            Self::Having => "HAVING",
        }
    }

    fn parse(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.label().eq_ignore_ascii_case(key))
    }

    const fn position(self) -> usize {
        self as usize
    }
}

/// Parse Phi specification text into a validated operator.
///
/// Lines are `key: value`. Blank lines and `#` comments are skipped,
/// unknown keys are ignored, and every recognized key is validated before
/// the operator is assembled.
pub fn parse_phi(text: &str) -> Result<PhiOperator, SpecError> {
    let mut entries: [Option<&str>; 6] = [None; 6];

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            return Err(SpecError::MalformedLine {
                line: line_no,
                text: line.to_string(),
            });
        };
        let key = key.trim();
        let Some(spec_key) = SpecKey::parse(key) else {
            log::debug!("ignoring unknown specification key '{key}' on line {line_no}");
            continue;
        };

        let slot = &mut entries[spec_key.position()];
        if slot.is_some() {
            return Err(SpecError::DuplicateKey {
                key: spec_key.label(),
                line: line_no,
            });
        }
        *slot = Some(value.trim());
    }

    let value_of = |key: SpecKey| entries[key.position()];
    let required = |key: SpecKey| value_of(key).ok_or(SpecError::MissingKey(key.label()));

    let n_text = required(SpecKey::GroupingVarCount)?;
    let n = n_text
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| SpecError::InvalidGroupingVarCount(n_text.to_string()))?;

    let select = split_items(required(SpecKey::Select)?, ',', SpecKey::Select)?;
    let grouping_attrs = split_items(
        required(SpecKey::GroupingAttrs)?,
        ',',
        SpecKey::GroupingAttrs,
    )?;

    let aggregates = match value_of(SpecKey::Aggregates) {
        Some(value) if !value.is_empty() => split_items(value, ',', SpecKey::Aggregates)?
            .iter()
            .map(|item| AggregateFn::parse(item, n))
            .collect::<Result<Vec<_>, _>>()?,
        _ => Vec::new(),
    };

    let predicates = value_of(SpecKey::Predicates).map_or_else(Vec::new, split_predicates);
    let having = value_of(SpecKey::Having).map(str::to_string);

    PhiOperator::new(select, n, grouping_attrs, aggregates, predicates, having)
}

// Split a required list; every entry must be non-empty.
fn split_items(value: &str, separator: char, key: SpecKey) -> Result<Vec<String>, SpecError> {
    if value.is_empty() {
        return Err(SpecError::EmptyList(key.label()));
    }

    split_top_level(value, separator)
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            if item.is_empty() {
                Err(SpecError::EmptyItem {
                    key: key.label(),
                    position: index + 1,
                })
            } else {
                Ok(item)
            }
        })
        .collect()
}

// Predicates keep blank entries (always-true) but drop trailing separators.
fn split_predicates(value: &str) -> Vec<String> {
    let mut predicates = split_top_level(value, ';');
    while predicates.last().is_some_and(String::is_empty) {
        predicates.pop();
    }

    predicates
}

// Split on `separator` outside quoted literals and parentheses.
fn split_top_level(value: &str, separator: char) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;

    for ch in value.chars() {
        match (quote, ch) {
            (Some(open), _) if ch == open => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(ch),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, _) if ch == separator && depth == 0 => {
                items.push(current.trim().to_string());
                current.clear();
                continue;
            }
            (None, _) => {}
        }
        current.push(ch);
    }
    items.push(current.trim().to_string());

    items
}
