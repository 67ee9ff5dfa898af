//! Builds SQL `WHERE` clauses for selecting transactions.

use rusqlite::types::Value;

use crate::{MonthFilter, db::CASEFOLD_FUNCTION};

/// Defines which transactions a [TransactionStore](super::TransactionStore) operation applies to.
///
/// Every condition that is set must hold for a transaction to match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Only include transactions sold in this calendar month, in any year.
    pub month: Option<MonthFilter>,
    /// Only include transactions whose title or description contains this
    /// text, ignoring case. The text is matched literally, not as a pattern.
    pub text: Option<String>,
    /// Only include transactions with exactly this price.
    pub price: Option<f64>,
    /// Only include transactions with this sold status.
    pub sold: Option<bool>,
}

impl TransactionFilter {
    /// A filter that selects every transaction in `month`, or every transaction if `None`.
    pub fn for_month(month: Option<MonthFilter>) -> Self {
        Self {
            month,
            ..Default::default()
        }
    }

    /// Restrict the filter to transactions that did, or did not, sell.
    pub fn with_sold(self, sold: bool) -> Self {
        Self {
            sold: Some(sold),
            ..self
        }
    }

    /// Build the `WHERE` clause and its positional parameters.
    ///
    /// Returns an empty string when the filter has no conditions.
    pub(crate) fn where_clause(&self) -> (String, Vec<Value>) {
        let mut where_clause_parts = vec![];
        let mut query_parameters = vec![];

        if let Some(month) = self.month {
            query_parameters.push(Value::Integer(month.number().into()));
            where_clause_parts.push(format!(
                "CAST(strftime('%m', date_of_sale) AS INTEGER) = ?{}",
                query_parameters.len()
            ));
        }

        if let Some(text) = &self.text {
            query_parameters.push(Value::Text(text.to_lowercase()));
            let index = query_parameters.len();
            where_clause_parts.push(format!(
                "(instr({CASEFOLD_FUNCTION}(title), ?{index}) > 0 \
                OR instr({CASEFOLD_FUNCTION}(description), ?{index}) > 0)"
            ));
        }

        if let Some(price) = self.price {
            query_parameters.push(Value::Real(price));
            where_clause_parts.push(format!("price = ?{}", query_parameters.len()));
        }

        if let Some(sold) = self.sold {
            query_parameters.push(Value::Integer(sold.into()));
            where_clause_parts.push(format!("sold = ?{}", query_parameters.len()));
        }

        if where_clause_parts.is_empty() {
            (String::new(), query_parameters)
        } else {
            (
                String::from("WHERE ") + &where_clause_parts.join(" AND "),
                query_parameters,
            )
        }
    }
}
