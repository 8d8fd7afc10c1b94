use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use lendbook_core::{Identity, LendError, LendResult, LoanId};

/// Command: open a new loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenLoan {
    pub lender: Identity,
    pub borrower: Identity,
    pub item_name: String,
    pub quantity: i64,
    pub date_given: NaiveDate,
    pub date_due: Option<NaiveDate>,
}

impl OpenLoan {
    /// Validate the command: no self-loan, positive quantity, non-blank item.
    pub fn validate(&self) -> LendResult<()> {
        if self.lender == self.borrower {
            return Err(LendError::validation("cannot lend an item to yourself"));
        }
        if self.item_name.trim().is_empty() {
            return Err(LendError::validation("item name cannot be empty"));
        }
        if self.quantity <= 0 {
            return Err(LendError::validation("quantity must be positive"));
        }
        Ok(())
    }
}

/// One row of the shared loan ledger.
///
/// Jointly referenced by lender and borrower, owned by neither; append-mostly
/// with exactly one permitted state transition (`returned: false -> true`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRecord {
    id: LoanId,
    lender: Identity,
    borrower: Identity,
    item_name: String,
    quantity: i64,
    date_given: NaiveDate,
    date_due: Option<NaiveDate>,
    returned: bool,
}

impl LoanRecord {
    /// Open a loan with `returned == false`.
    pub fn open(cmd: &OpenLoan) -> LendResult<Self> {
        cmd.validate()?;
        Ok(Self {
            id: LoanId::new(),
            lender: cmd.lender.clone(),
            borrower: cmd.borrower.clone(),
            item_name: cmd.item_name.trim().to_string(),
            quantity: cmd.quantity,
            date_given: cmd.date_given,
            date_due: cmd.date_due,
            returned: false,
        })
    }

    pub fn id(&self) -> LoanId {
        self.id
    }

    pub fn lender(&self) -> &Identity {
        &self.lender
    }

    pub fn borrower(&self) -> &Identity {
        &self.borrower
    }

    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn date_given(&self) -> NaiveDate {
        self.date_given
    }

    pub fn date_due(&self) -> Option<NaiveDate> {
        self.date_due
    }

    pub fn returned(&self) -> bool {
        self.returned
    }

    /// Flip the record to returned. One-directional and irreversible.
    pub fn mark_returned(&mut self) -> LendResult<()> {
        if self.returned {
            return Err(LendError::validation("loan is already returned"));
        }
        self.returned = true;
        Ok(())
    }

    /// An outstanding loan past its due date. Derived, never stored.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.returned && self.date_due.is_some_and(|due| due < today)
    }
}
