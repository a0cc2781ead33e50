use crate::model::{ColumnRef, EntityKind, Hierarchy, RelationSide, Step};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static HEADER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^hierarchy\s*$").unwrap());
static CONFIG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^%%\{\s*config\s*:\s*(\{.*\})\s*\}%%$").unwrap());
static ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(group|space)\s+([A-Za-z0-9_:.-]+)(?:\s+"([^"]*)")?$"#).unwrap()
});
static RELATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^relation\s+([A-Za-z0-9_:.-]+)\s*->\s*([A-Za-z0-9_:.-]+)(\s+hidden)?$").unwrap()
});
static START_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^start\s+([A-Za-z0-9_:.-]+)$").unwrap());
static EXPANSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(expand|collapse)\s+(parents|children)\s+([A-Za-z0-9_:.-]+)$").unwrap()
});
static SCROLL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^scroll\s+(start|(?:parents|children)\s+[A-Za-z0-9_:.-]+)\s+(-?[0-9]+(?:\.[0-9]+)?)$",
    )
    .unwrap()
});
static FILTER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^filter\s+"([^"]*)"$"#).unwrap());

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("missing 'hierarchy' header")]
    MissingHeader,
    #[error("line {line}: unrecognized directive '{text}'")]
    Syntax { line: usize, text: String },
    #[error("invalid inline config: {0}")]
    InlineConfig(String),
}

#[derive(Debug, Default)]
pub struct ParseOutput {
    pub hierarchy: Hierarchy,
    pub init_config: Option<serde_json::Value>,
}

pub fn parse_hierarchy(input: &str) -> Result<ParseOutput, ParseError> {
    let mut hierarchy = Hierarchy::new();
    let mut init_config = None;
    let mut header_seen = false;

    for (index, raw_line) in input.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(captures) = CONFIG_RE.captures(line) {
            let parsed = json5::from_str(&captures[1])
                .map_err(|error| ParseError::InlineConfig(error.to_string()))?;
            init_config = Some(parsed);
            continue;
        }
        if line.starts_with("%%") {
            continue;
        }
        if !header_seen {
            if HEADER_RE.is_match(line) {
                header_seen = true;
                continue;
            }
            return Err(ParseError::MissingHeader);
        }
        parse_directive(line, index + 1, &mut hierarchy)?;
    }

    if !header_seen {
        return Err(ParseError::MissingHeader);
    }
    hierarchy.resolve_parent_kinds();
    Ok(ParseOutput {
        hierarchy,
        init_config,
    })
}

fn parse_directive(
    line: &str,
    number: usize,
    hierarchy: &mut Hierarchy,
) -> Result<(), ParseError> {
    if let Some(captures) = ENTITY_RE.captures(line) {
        let kind = EntityKind::from_token(&captures[1]);
        let name = captures.get(3).map(|m| m.as_str().to_string());
        hierarchy.ensure_group(&captures[2], name, kind);
        return Ok(());
    }

    // Relations may reference ids that are never declared; that is surfaced
    // later as a failed column, not a parse error.
    if let Some(captures) = RELATION_RE.captures(line) {
        let can_view_privileges = captures.get(3).is_none();
        hierarchy.add_relation(&captures[1], &captures[2], can_view_privileges);
        return Ok(());
    }

    if let Some(captures) = START_RE.captures(line) {
        hierarchy.start = Some(captures[1].to_string());
        return Ok(());
    }

    if let Some(captures) = EXPANSION_RE.captures(line) {
        let side = RelationSide::from_token(&captures[2]).ok_or_else(|| ParseError::Syntax {
            line: number,
            text: line.to_string(),
        })?;
        let group_id = captures[3].to_string();
        let step = if &captures[1] == "expand" {
            Step::Expand { side, group_id }
        } else {
            Step::Collapse { side, group_id }
        };
        hierarchy.steps.push(step);
        return Ok(());
    }

    if let Some(captures) = SCROLL_RE.captures(line) {
        let target = parse_column_ref(&captures[1]).ok_or_else(|| ParseError::Syntax {
            line: number,
            text: line.to_string(),
        })?;
        let value: f32 = captures[2].parse().map_err(|_| ParseError::Syntax {
            line: number,
            text: line.to_string(),
        })?;
        hierarchy.steps.push(Step::Scroll { target, value });
        return Ok(());
    }

    if let Some(captures) = FILTER_RE.captures(line) {
        hierarchy.steps.push(Step::Filter {
            text: captures[1].to_string(),
        });
        return Ok(());
    }

    Err(ParseError::Syntax {
        line: number,
        text: line.to_string(),
    })
}

fn parse_column_ref(token: &str) -> Option<ColumnRef> {
    if token == "start" {
        return Some(ColumnRef::StartPoint);
    }
    let mut parts = token.split_whitespace();
    let side = RelationSide::from_token(parts.next()?)?;
    let group_id = parts.next()?.to_string();
    Some(ColumnRef::Expansion { side, group_id })
}
