use model::entities::recurring_definition::{self, RecurrenceType};
use rust_decimal::Decimal;

use crate::numeric;

/// The recurrence-specific payload of a definition, with the stored value
/// already coerced to a number.
///
/// The entity keeps one record with optional fields; this collapses it into
/// a variant per recurrence type so the projection code cannot read a field
/// that does not apply (e.g. a percentage on a fixed expense).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceKind {
    Fixed {
        amount: Decimal,
    },
    Variable {
        amount: Decimal,
    },
    Installment {
        amount: Decimal,
        total_installments: u32,
    },
    VariableByIncome {
        percentage: Decimal,
        selected_income_id: Option<i32>,
    },
}

impl RecurrenceKind {
    /// Classifies a stored definition. Unparsable values become zero and a
    /// missing installment count becomes zero installments; neither is an
    /// error, projection simply emits nothing of value for them.
    pub fn from_definition(def: &recurring_definition::Model) -> Self {
        let value = numeric::parse_or_zero(&def.raw_value);
        match def.recurrence {
            RecurrenceType::Fixed => RecurrenceKind::Fixed { amount: value },
            RecurrenceType::Variable => RecurrenceKind::Variable { amount: value },
            RecurrenceType::Installment => RecurrenceKind::Installment {
                amount: value,
                total_installments: def.total_installments.unwrap_or(0).max(0) as u32,
            },
            RecurrenceType::VariableByIncome => RecurrenceKind::VariableByIncome {
                percentage: value,
                selected_income_id: def.selected_income_id,
            },
        }
    }
}
