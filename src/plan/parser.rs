use crate::database::models::CleaningType;

/// One accepted plan line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRecord {
    pub room_no: u32,
    pub staff_name: String,
    pub cleaning_type: CleaningType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPlan {
    pub records: Vec<PlanRecord>,
    /// Non-blank lines that were dropped (headers, short or malformed rows).
    pub skipped_lines: usize,
}

impl ParsedPlan {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows whose room number already appeared earlier in the same file.
    pub fn duplicate_rows(&self) -> usize {
        let mut seen = std::collections::HashSet::new();
        self.records
            .iter()
            .filter(|record| !seen.insert(record.room_no))
            .count()
    }
}

/// Parses `room_no, staff_name, cleaning_type` lines separated by `,` or `;`.
///
/// A line whose first field is not a room number is treated as a header or
/// garbage and counted in `skipped_lines`.
pub fn parse_plan(text: &str) -> ParsedPlan {
    let mut plan = ParsedPlan::default();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match parse_line(line) {
            Some(record) => plan.records.push(record),
            None => plan.skipped_lines += 1,
        }
    }

    plan
}

fn parse_line(line: &str) -> Option<PlanRecord> {
    let delimiter = if line.contains(';') { ';' } else { ',' };
    let fields: Vec<&str> = line
        .split(delimiter)
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect();

    if fields.len() < 3 {
        return None;
    }

    let room_no = fields[0].parse::<u32>().ok()?;

    Some(PlanRecord {
        room_no,
        staff_name: fields[1].to_string(),
        cleaning_type: CleaningType::from_plan_field(fields[2]),
    })
}
