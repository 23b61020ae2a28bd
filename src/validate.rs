use std::fmt;

use tracing::debug;

use crate::model::{PermissionKind, PermissionRecord};

/// 権限レコード 1 件に対する不備
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordIssue {
    /// 入力リスト中の位置
    pub index: usize,
    pub id: Option<String>,
    pub problem: Problem,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    MenuWithoutAddress,
    ButtonWithoutValue,
    UnknownType(String),
    SelfParent,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Problem::MenuWithoutAddress => write!(f, "menu record has no address"),
            Problem::ButtonWithoutValue => write!(f, "button record has no value"),
            Problem::UnknownType(raw) if raw.is_empty() => write!(f, "record has no type"),
            Problem::UnknownType(raw) => write!(f, "unknown record type {raw:?}"),
            Problem::SelfParent => write!(f, "record is its own parent"),
        }
    }
}

impl fmt::Display for RecordIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "record #{} (id {}): {}", self.index, id, self.problem),
            None => write!(f, "record #{}: {}", self.index, self.problem),
        }
    }
}

/// 権限レコードの形をチェックする。
///
/// 通常モードではこの結果は使わず、不備のあるレコードは黙って除外される。
/// strict モードの場合のみ、1 件でも不備があればエラーとして扱う。
pub fn validate_records(records: &[PermissionRecord]) -> Vec<RecordIssue> {
    let mut issues = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let mut push = |problem| {
            issues.push(RecordIssue {
                index,
                id: record.id.clone(),
                problem,
            })
        };

        match &record.kind {
            kind if kind.is_menu() && record.address().is_none() => {
                push(Problem::MenuWithoutAddress)
            }
            PermissionKind::Button if record.value.is_none() => push(Problem::ButtonWithoutValue),
            PermissionKind::Unknown(raw) => push(Problem::UnknownType(raw.clone())),
            _ => {}
        }

        if record.id.is_some() && record.id == record.parent_id {
            push(Problem::SelfParent);
        }
    }

    debug!(records = records.len(), issues = issues.len(), "validated permission records");
    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_records_have_no_issues() {
        let records = vec![
            PermissionRecord::route("1", Some("qyai"), "/system"),
            PermissionRecord::button("edit"),
        ];
        assert!(validate_records(&records).is_empty());
    }

    #[test]
    fn reports_each_problem_with_its_index() {
        let records = vec![
            PermissionRecord {
                id: Some("7".into()),
                kind: PermissionKind::Page,
                ..Default::default()
            },
            PermissionRecord {
                kind: PermissionKind::Button,
                ..Default::default()
            },
            PermissionRecord {
                kind: PermissionKind::Unknown("9".into()),
                ..Default::default()
            },
            PermissionRecord::route("4", Some("4"), "/loop"),
        ];

        let problems: Vec<_> = validate_records(&records)
            .into_iter()
            .map(|issue| (issue.index, issue.problem))
            .collect();

        assert_eq!(
            problems,
            vec![
                (0, Problem::MenuWithoutAddress),
                (1, Problem::ButtonWithoutValue),
                (2, Problem::UnknownType("9".into())),
                (3, Problem::SelfParent),
            ]
        );
    }

    #[test]
    fn issue_display_mentions_id() {
        let issue = RecordIssue {
            index: 2,
            id: Some("42".into()),
            problem: Problem::MenuWithoutAddress,
        };
        assert_eq!(issue.to_string(), "record #2 (id 42): menu record has no address");
    }
}
