//! Monthly budget board: one record per month key.
//!
//! Every change rewrites the whole month record: an unsaved month is
//! inserted, a saved one updated in place.

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use super::model::{BudgetRow, LineItem, LineKind, MonthBudget};
use super::view::{BudgetMonthView, render_month};
use crate::error::{Result, StoreError, ValidationError};
use crate::period::{Clock, MonthKey, derive_month_key};
use crate::record::{Lifecycle, LocalId, Record, RemoteId};
use crate::store::RemoteStore;

/// Group bulk-read rows by month key. A later row for the same month replaces
/// an earlier one.
pub fn group_rows(rows: Vec<BudgetRow>) -> BTreeMap<MonthKey, Record<MonthBudget>> {
    let mut months = BTreeMap::new();
    for row in rows {
        let month = match row.month_key.parse::<MonthKey>() {
            Ok(month) => month,
            Err(e) => {
                warn!(id = %row.id, error = %e, "Skipping budget with invalid month key");
                continue;
            }
        };
        if let Some(previous) = months.insert(month, Record::saved(row.id, row.budget)) {
            warn!(
                %month,
                replaced = ?previous.remote_id(),
                id = %row.id,
                "Duplicate budget rows for month, keeping the latest"
            );
        }
    }
    months
}

pub struct BudgetBoard {
    store: Arc<dyn RemoteStore>,
    clock: Arc<dyn Clock>,
    months: BTreeMap<MonthKey, Record<MonthBudget>>,
    month_offset: i32,
}

impl BudgetBoard {
    pub fn new(store: Arc<dyn RemoteStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            months: BTreeMap::new(),
            month_offset: 0,
        }
    }

    /// Replace the mirror with a bulk read. Returns the number of months loaded.
    pub async fn load(&mut self) -> std::result::Result<usize, StoreError> {
        let rows = self.store.list_budgets().await?;
        self.months = group_rows(rows);
        info!(count = self.months.len(), "Budgets loaded");
        Ok(self.months.len())
    }

    pub fn month_offset(&self) -> i32 {
        self.month_offset
    }

    pub fn current_month(&self) -> MonthKey {
        derive_month_key(self.clock.today()).shift(self.month_offset)
    }

    pub fn month(&self, month: MonthKey) -> Option<&Record<MonthBudget>> {
        self.months.get(&month)
    }

    pub fn prev_month(&mut self) -> MonthKey {
        self.month_offset = self.month_offset.saturating_sub(1);
        self.arrive()
    }

    pub fn next_month(&mut self) -> MonthKey {
        self.month_offset = self.month_offset.saturating_add(1);
        self.arrive()
    }

    pub fn view(&self) -> BudgetMonthView {
        let month = self.current_month();
        render_month(self.months.get(&month), month, self.month_offset)
    }

    pub async fn set_income(&mut self, amount: Decimal) -> Result<()> {
        let mut budget = self.current_data();
        budget.income = amount;
        self.commit(budget, "income")?;
        self.persist_current().await;
        Ok(())
    }

    pub async fn set_savings(&mut self, amount: Decimal) -> Result<()> {
        let mut budget = self.current_data();
        budget.savings = amount;
        self.commit(budget, "savings")?;
        self.persist_current().await;
        Ok(())
    }

    pub async fn add_expense(&mut self, name: &str, amount: Decimal) -> Result<()> {
        self.add_line(LineKind::Expense, name, amount).await
    }

    pub async fn add_extra(&mut self, name: &str, amount: Decimal) -> Result<()> {
        self.add_line(LineKind::Extra, name, amount).await
    }

    pub async fn remove_expense(&mut self, index: usize) -> Result<LineItem> {
        self.remove_line(LineKind::Expense, index).await
    }

    pub async fn remove_extra(&mut self, index: usize) -> Result<LineItem> {
        self.remove_line(LineKind::Extra, index).await
    }

    /// Insert every unsaved month that holds any data. Returns how many were
    /// reconciled.
    pub async fn sync_pending(&mut self) -> usize {
        let pending: Vec<(MonthKey, LocalId, MonthBudget)> = self
            .months
            .iter()
            .filter(|(_, r)| !r.is_saved() && r.data != MonthBudget::default())
            .map(|(month, r)| (*month, r.local_id, r.data.clone()))
            .collect();

        let mut synced = 0;
        for (month, local_id, budget) in pending {
            match self.store.insert_budget(&month.to_string(), &budget).await {
                Ok(remote_id) => {
                    self.attach(month, local_id, remote_id);
                    synced += 1;
                }
                Err(e) => error!(%month, error = %e, "Failed to sync pending budget"),
            }
        }
        synced
    }

    async fn add_line(&mut self, kind: LineKind, name: &str, amount: Decimal) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Empty { field: "name" }.into());
        }
        if amount.is_zero() {
            return Err(ValidationError::ZeroAmount { field: "amount" }.into());
        }
        let mut budget = self.current_data();
        budget.lines_mut(kind).push(LineItem::new(name, amount));
        self.commit(budget, "amount")?;
        self.persist_current().await;
        Ok(())
    }

    async fn remove_line(&mut self, kind: LineKind, index: usize) -> Result<LineItem> {
        let len = self
            .months
            .get(&self.current_month())
            .map_or(0, |r| r.data.lines(kind).len());
        if index >= len {
            return Err(ValidationError::IndexOutOfRange { index, len }.into());
        }
        let mut budget = self.current_data();
        let removed = budget.lines_mut(kind).remove(index);
        self.commit(budget, kind.field())?;
        debug!(field = kind.field(), index, name = %removed.name, "Budget line removed");
        self.persist_current().await;
        Ok(removed)
    }

    /// Make sure the month being navigated to has a mirror entry.
    fn arrive(&mut self) -> MonthKey {
        let month = self.current_month();
        self.months
            .entry(month)
            .or_insert_with(|| Record::unsaved(MonthBudget::default()));
        month
    }

    /// Copy of the current month's data, empty when it has no mirror entry.
    fn current_data(&self) -> MonthBudget {
        self.months
            .get(&self.current_month())
            .map(|r| r.data.clone())
            .unwrap_or_default()
    }

    /// Replace the current month's data once its totals are known to fit.
    fn commit(&mut self, budget: MonthBudget, field: &'static str) -> Result<()> {
        if budget.checked_final_left().is_none() {
            return Err(ValidationError::AmountOutOfRange { field }.into());
        }
        self.current_mut().data = budget;
        Ok(())
    }

    fn current_mut(&mut self) -> &mut Record<MonthBudget> {
        let month = self.current_month();
        self.months
            .entry(month)
            .or_insert_with(|| Record::unsaved(MonthBudget::default()))
    }

    /// Write the current month through: update when saved, insert otherwise.
    async fn persist_current(&mut self) {
        let month = self.current_month();
        let Some(record) = self.months.get(&month) else {
            return;
        };
        let budget = record.data.clone();
        let local_id = record.local_id;
        let lifecycle = record.lifecycle;

        match lifecycle {
            Lifecycle::Saved(remote_id) => {
                match self.store.update_budget(remote_id, &budget).await {
                    Ok(true) => debug!(%month, id = %remote_id, "Budget updated"),
                    Ok(false) => warn!(%month, id = %remote_id, "Budget missing remotely during update"),
                    Err(e) => error!(%month, id = %remote_id, error = %e, "Failed to update budget"),
                }
            }
            Lifecycle::Unsaved => {
                match self.store.insert_budget(&month.to_string(), &budget).await {
                    Ok(remote_id) => {
                        self.attach(month, local_id, remote_id);
                        debug!(%month, id = %remote_id, "Budget saved");
                    }
                    Err(e) => error!(%month, error = %e, "Failed to save budget"),
                }
            }
        }
    }

    fn attach(&mut self, month: MonthKey, local_id: LocalId, remote_id: RemoteId) {
        match self.months.get_mut(&month) {
            Some(record) if record.local_id == local_id => record.mark_saved(remote_id),
            _ => warn!(%month, id = %remote_id, "Budget replaced before its insert returned"),
        }
    }
}
