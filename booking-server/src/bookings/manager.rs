//! BookingManager - booking state machine and seat claims
//!
//! # Create Flow
//!
//! ```text
//! create_booking(customer, seats)
//!     ├─ 1. Validate customer fields / non-empty selection
//!     ├─ 2. Begin write transaction (serializes with every other writer)
//!     ├─ 3. Read catalog + zone policies from the same transaction
//!     ├─ 4. Price the selection (pure engine)
//!     ├─ 5. Check every seat hold; any taken → abort, SeatConflict
//!     ├─ 6. Insert holds, booking record, pending payment index
//!     ├─ 7. Commit
//!     └─ 8. Broadcast BookingEvent
//! ```

use shared::models::{
    BookingFilter, BookingRecord, BookingSeat, BookingStatus, BookingUpdate, CustomerInfo,
    SelectedSeat,
};
use std::sync::Arc;
use tokio::sync::broadcast;

use super::{BookingError, BookingEvent, BookingEventKind, BookingResult, CancelledBy};
use crate::catalog::CatalogSnapshot;
use crate::db::{Storage, StorageError};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{Clock, SystemClock};

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// BookingManager
///
/// 预订状态的唯一写入方。`total_price` 只在创建时由计价引擎算出一次。
#[derive(Clone)]
pub struct BookingManager {
    storage: Storage,
    clock: Arc<dyn Clock>,
    /// 付款时限 (毫秒)
    payment_window_millis: i64,
    event_tx: broadcast::Sender<BookingEvent>,
}

impl std::fmt::Debug for BookingManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingManager")
            .field("storage", &"<Storage>")
            .field("clock", &self.clock)
            .field("payment_window_millis", &self.payment_window_millis)
            .finish()
    }
}

impl BookingManager {
    pub fn new(storage: Storage, payment_window_millis: i64) -> Self {
        Self::with_clock(storage, payment_window_millis, Arc::new(SystemClock))
    }

    pub fn with_clock(
        storage: Storage,
        payment_window_millis: i64,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            storage,
            clock,
            payment_window_millis,
            event_tx,
        }
    }

    /// Subscribe to lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<BookingEvent> {
        self.event_tx.subscribe()
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    pub fn payment_window_millis(&self) -> i64 {
        self.payment_window_millis
    }

    fn publish(&self, kind: BookingEventKind, record: &BookingRecord) {
        let event = BookingEvent {
            kind,
            booking_id: record.id.clone(),
            status: record.status,
            seat_count: record.seat_count(),
            timestamp: self.clock.now_millis(),
        };
        if self.event_tx.send(event).is_err() {
            tracing::trace!(booking_id = %record.id, "No event subscribers");
        }
    }

    // ========== Queries ==========

    pub fn get_booking(&self, booking_id: &str) -> BookingResult<BookingRecord> {
        self.storage
            .get_booking(booking_id)?
            .ok_or_else(|| BookingError::NotFound(booking_id.to_string()))
    }

    pub fn list_bookings(&self, filter: &BookingFilter) -> BookingResult<Vec<BookingRecord>> {
        Ok(self
            .storage
            .list_bookings()?
            .into_iter()
            .filter(|r| filter.matches(r))
            .collect())
    }

    // ========== Commands ==========

    /// Price and atomically claim the selected seats
    ///
    /// 任一座位已被占用时整单失败 (`SeatConflict`)，不做部分预订也不自动重试。
    pub fn create_booking(
        &self,
        customer: CustomerInfo,
        seats: Vec<SelectedSeat>,
    ) -> BookingResult<BookingRecord> {
        validate_required_text(&customer.customer_name, "customer_name", MAX_NAME_LEN)?;
        validate_required_text(&customer.phone, "phone", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&customer.notes, "notes", MAX_NOTE_LEN)?;
        if seats.is_empty() {
            return Err(BookingError::EmptySelection);
        }

        let txn = self.storage.begin_write()?;

        let (tables, zones) = self.storage.read_catalog_txn(&txn)?;
        let snapshot = CatalogSnapshot::from_parts(tables, zones);
        let breakdown = snapshot.price(&seats)?;

        let mut conflicts = Vec::new();
        for seat in &seats {
            if self
                .storage
                .get_hold_txn(&txn, seat.table_id, seat.seat_number)?
                .is_some()
            {
                conflicts.push(*seat);
            }
        }
        if !conflicts.is_empty() {
            tracing::info!(
                conflicts = conflicts.len(),
                requested = seats.len(),
                "Seat claim lost, booking rejected"
            );
            txn.abort().map_err(StorageError::from)?;
            return Err(BookingError::SeatConflict(conflicts));
        }

        let now = self.clock.now_millis();
        let booking_id = uuid::Uuid::new_v4().to_string();
        let deadline = now.saturating_add(self.payment_window_millis);

        let mut booking_seats = Vec::with_capacity(seats.len());
        for seat in &seats {
            let zone = snapshot.zone_of(seat.table_id).ok_or_else(|| {
                crate::pricing::PricingError::InternalInvariant(format!(
                    "Table {} priced but missing from snapshot",
                    seat.table_id
                ))
            })?;
            booking_seats.push(BookingSeat {
                table_id: seat.table_id,
                seat_number: seat.seat_number,
                zone: zone.to_string(),
            });
            self.storage
                .insert_hold(&txn, seat.table_id, seat.seat_number, &booking_id)?;
        }

        let record = BookingRecord {
            id: booking_id,
            customer_name: customer.customer_name.trim().to_string(),
            phone: customer.phone.trim().to_string(),
            notes: customer.notes,
            seats: booking_seats,
            total_price: breakdown.total_final_price,
            status: BookingStatus::PendingPayment,
            booking_date: now,
            payment_proof: None,
            payment_deadline: Some(deadline),
            updated_at: now,
        };
        self.storage.put_booking(&txn, &record)?;
        self.storage.insert_pending(&txn, &record.id, deadline)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(
            booking_id = %record.id,
            seats = record.seat_count(),
            total = %record.total_price,
            deadline = %shared::util::format_millis(deadline),
            "Booking created"
        );
        self.publish(BookingEventKind::Created, &record);
        Ok(record)
    }

    /// Attach payment proof and confirm
    ///
    /// 仅 `pending_payment` 且未过付款时限时允许；过期时不做任何修改。
    pub fn confirm_payment(
        &self,
        booking_id: &str,
        payment_proof: &str,
    ) -> BookingResult<BookingRecord> {
        validate_required_text(payment_proof, "payment_proof", MAX_NOTE_LEN)?;

        let txn = self.storage.begin_write()?;
        let mut record = self
            .storage
            .get_booking_txn(&txn, booking_id)?
            .ok_or_else(|| BookingError::NotFound(booking_id.to_string()))?;

        if record.status != BookingStatus::PendingPayment {
            return Err(BookingError::InvalidState {
                booking_id: record.id,
                status: record.status,
                action: "confirm",
            });
        }

        let now = self.clock.now_millis();
        if let Some(deadline) = record.payment_deadline
            && now > deadline
        {
            tracing::info!(booking_id = %record.id, "Payment arrived after deadline");
            return Err(BookingError::DeadlineExpired {
                booking_id: record.id,
                deadline,
            });
        }

        record.status = BookingStatus::Confirmed;
        record.payment_proof = Some(payment_proof.trim().to_string());
        record.payment_deadline = None;
        record.updated_at = now;
        self.storage.put_booking(&txn, &record)?;
        self.storage.remove_pending(&txn, &record.id)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(booking_id = %record.id, "Booking confirmed");
        self.publish(BookingEventKind::Confirmed, &record);
        Ok(record)
    }

    /// Cancel and release seats
    pub fn cancel_booking(
        &self,
        booking_id: &str,
        by: CancelledBy,
    ) -> BookingResult<BookingRecord> {
        let txn = self.storage.begin_write()?;
        let mut record = self
            .storage
            .get_booking_txn(&txn, booking_id)?
            .ok_or_else(|| BookingError::NotFound(booking_id.to_string()))?;

        let allowed = match by {
            CancelledBy::Customer => record.status == BookingStatus::PendingPayment,
            CancelledBy::Admin => !record.status.is_terminal(),
        };
        if !allowed {
            return Err(BookingError::InvalidState {
                booking_id: record.id,
                status: record.status,
                action: "cancel",
            });
        }

        let released = self.release_seats(&txn, &record)?;
        record.status = BookingStatus::Cancelled;
        record.payment_deadline = None;
        record.updated_at = self.clock.now_millis();
        self.storage.put_booking(&txn, &record)?;
        self.storage.remove_pending(&txn, &record.id)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(booking_id = %record.id, by = ?by, released, "Booking cancelled");
        self.publish(BookingEventKind::Cancelled, &record);
        Ok(record)
    }

    /// Move an overdue booking to `payment_timeout` and release its seats
    ///
    /// 返回 `None` 表示无操作：预订已不是 `pending_payment`，或尚未到期。
    /// 重复调用与调用一次效果相同。
    pub fn expire_booking(&self, booking_id: &str) -> BookingResult<Option<BookingRecord>> {
        let txn = self.storage.begin_write()?;
        let mut record = self
            .storage
            .get_booking_txn(&txn, booking_id)?
            .ok_or_else(|| BookingError::NotFound(booking_id.to_string()))?;

        if record.status != BookingStatus::PendingPayment {
            return Ok(None);
        }
        let now = self.clock.now_millis();
        if record.payment_deadline.is_some_and(|deadline| now <= deadline) {
            return Ok(None);
        }

        let released = self.release_seats(&txn, &record)?;
        record.status = BookingStatus::PaymentTimeout;
        record.payment_deadline = None;
        record.updated_at = now;
        self.storage.put_booking(&txn, &record)?;
        self.storage.remove_pending(&txn, &record.id)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(booking_id = %record.id, released, "Booking payment timed out");
        self.publish(BookingEventKind::Expired, &record);
        Ok(Some(record))
    }

    /// Expire every booking whose deadline has passed
    ///
    /// 单个预订失败只记录日志，不影响其余预订。
    pub fn sweep_expired(&self) -> BookingResult<Vec<BookingRecord>> {
        let now = self.clock.now_millis();
        let due = self.storage.due_pending(now)?;
        let mut expired = Vec::new();

        for booking_id in due {
            match self.expire_booking(&booking_id) {
                Ok(Some(record)) => expired.push(record),
                Ok(None) => {}
                Err(BookingError::NotFound(_)) => {
                    // 索引残留：记录已被删除
                    let txn = self.storage.begin_write()?;
                    self.storage.remove_pending(&txn, &booking_id)?;
                    txn.commit().map_err(StorageError::from)?;
                }
                Err(e) => {
                    tracing::error!(booking_id = %booking_id, error = %e, "Failed to expire booking");
                }
            }
        }

        if !expired.is_empty() {
            tracing::info!(count = expired.len(), "Expired overdue bookings");
        }
        Ok(expired)
    }

    /// Edit customer details; never touches status, seats or total
    pub fn update_booking_details(
        &self,
        booking_id: &str,
        update: BookingUpdate,
    ) -> BookingResult<BookingRecord> {
        if let Some(name) = &update.customer_name {
            validate_required_text(name, "customer_name", MAX_NAME_LEN)?;
        }
        if let Some(phone) = &update.phone {
            validate_required_text(phone, "phone", MAX_SHORT_TEXT_LEN)?;
        }
        validate_optional_text(&update.notes, "notes", MAX_NOTE_LEN)?;

        let txn = self.storage.begin_write()?;
        let mut record = self
            .storage
            .get_booking_txn(&txn, booking_id)?
            .ok_or_else(|| BookingError::NotFound(booking_id.to_string()))?;

        if let Some(name) = update.customer_name {
            record.customer_name = name.trim().to_string();
        }
        if let Some(phone) = update.phone {
            record.phone = phone.trim().to_string();
        }
        if let Some(notes) = update.notes {
            record.notes = Some(notes);
        }
        record.updated_at = self.clock.now_millis();
        self.storage.put_booking(&txn, &record)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(booking_id = %record.id, "Booking details updated");
        self.publish(BookingEventKind::Updated, &record);
        Ok(record)
    }

    /// Remove a booking entirely (admin), releasing any seats it holds
    pub fn delete_booking(&self, booking_id: &str) -> BookingResult<BookingRecord> {
        let txn = self.storage.begin_write()?;
        let record = self
            .storage
            .get_booking_txn(&txn, booking_id)?
            .ok_or_else(|| BookingError::NotFound(booking_id.to_string()))?;

        let released = self.release_seats(&txn, &record)?;
        self.storage.remove_booking(&txn, &record.id)?;
        self.storage.remove_pending(&txn, &record.id)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::warn!(booking_id = %record.id, status = %record.status, released, "Booking deleted");
        self.publish(BookingEventKind::Deleted, &record);
        Ok(record)
    }

    fn release_seats(
        &self,
        txn: &redb::WriteTransaction,
        record: &BookingRecord,
    ) -> BookingResult<usize> {
        // 终止态预订的座位早已释放，可能已被新预订占用
        if !record.status.holds_seats() {
            return Ok(0);
        }
        let mut released = 0;
        for seat in &record.seats {
            if self
                .storage
                .release_hold(txn, seat.table_id, seat.seat_number, &record.id)?
            {
                released += 1;
            }
        }
        Ok(released)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed;
    use crate::pricing::PricingError;
    use crate::utils::ManualClock;
    use rust_decimal::Decimal;

    const WINDOW_MS: i64 = 20 * 60 * 1000;
    const START_MS: i64 = 1_700_000_000_000;

    /// Seeded store (A1..A3 = 1..3, B1..B3 = 4..6, C1..C3 = 7..9) with a manual clock
    fn setup() -> (BookingManager, ManualClock) {
        let storage = Storage::open_in_memory().unwrap();
        seed::seed_if_empty(&storage).unwrap();
        let clock = ManualClock::new(START_MS);
        let manager = BookingManager::with_clock(storage, WINDOW_MS, Arc::new(clock.clone()));
        (manager, clock)
    }

    fn customer(name: &str) -> CustomerInfo {
        CustomerInfo {
            customer_name: name.to_string(),
            phone: "0812345678".to_string(),
            notes: None,
        }
    }

    fn seats(table_id: i64, numbers: impl IntoIterator<Item = u32>) -> Vec<SelectedSeat> {
        numbers
            .into_iter()
            .map(|n| SelectedSeat::new(table_id, n))
            .collect()
    }

    fn is_held(manager: &BookingManager, table_id: i64, seat: u32) -> bool {
        manager
            .storage()
            .held_seats()
            .unwrap()
            .contains(&(table_id, seat))
    }

    #[test]
    fn test_create_booking_claims_and_prices() {
        let (manager, _) = setup();
        let record = manager
            .create_booking(customer("Nok"), seats(1, [1, 2, 3]))
            .unwrap();

        assert_eq!(record.status, BookingStatus::PendingPayment);
        assert_eq!(record.total_price, Decimal::from(450));
        assert_eq!(record.payment_deadline, Some(START_MS + WINDOW_MS));
        assert_eq!(record.booking_date, START_MS);
        assert!(record.seats.iter().all(|s| s.zone == "A"));
        assert!(is_held(&manager, 1, 2));
        assert_eq!(manager.get_booking(&record.id).unwrap(), record);
    }

    #[test]
    fn test_whole_table_and_forced_zone_totals() {
        let (manager, _) = setup();
        let full = manager
            .create_booking(customer("Full"), seats(2, 1..=9))
            .unwrap();
        assert_eq!(full.total_price, Decimal::from(1200));

        let forced = manager
            .create_booking(customer("Forced"), seats(7, [5]))
            .unwrap();
        assert_eq!(forced.total_price, Decimal::from(1800));
    }

    #[test]
    fn test_overlapping_booking_conflicts_without_partial_claim() {
        let (manager, _) = setup();
        manager
            .create_booking(customer("First"), seats(5, [3]))
            .unwrap();

        let err = manager
            .create_booking(customer("Second"), seats(5, [2, 3, 4]))
            .unwrap_err();
        match err {
            BookingError::SeatConflict(conflicts) => {
                assert_eq!(conflicts, vec![SelectedSeat::new(5, 3)]);
            }
            other => panic!("expected SeatConflict, got {other:?}"),
        }

        assert!(!is_held(&manager, 5, 2));
        assert!(!is_held(&manager, 5, 4));
        assert_eq!(
            manager.list_bookings(&BookingFilter::default()).unwrap().len(),
            1
        );
    }

    #[test]
    fn test_create_validation() {
        let (manager, _) = setup();

        let err = manager
            .create_booking(customer("  "), seats(1, [1]))
            .unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));

        let mut no_phone = customer("Nok");
        no_phone.phone = String::new();
        assert!(matches!(
            manager.create_booking(no_phone, seats(1, [1])).unwrap_err(),
            BookingError::Validation(_)
        ));

        assert!(matches!(
            manager.create_booking(customer("Nok"), vec![]).unwrap_err(),
            BookingError::EmptySelection
        ));
    }

    #[test]
    fn test_invalid_selection_surfaces_pricing_error() {
        let (manager, _) = setup();
        let err = manager
            .create_booking(customer("Nok"), seats(42, [1]))
            .unwrap_err();
        assert!(matches!(
            err,
            BookingError::Pricing(PricingError::InvalidSelection(_))
        ));
        assert!(manager.storage().held_seats().unwrap().is_empty());
    }

    #[test]
    fn test_confirm_within_window() {
        let (manager, clock) = setup();
        let record = manager
            .create_booking(customer("Nok"), seats(1, [1]))
            .unwrap();

        clock.advance_secs(19 * 60);
        let confirmed = manager.confirm_payment(&record.id, "slip-001.jpg").unwrap();
        assert_eq!(confirmed.status, BookingStatus::Confirmed);
        assert_eq!(confirmed.payment_proof.as_deref(), Some("slip-001.jpg"));
        assert!(confirmed.payment_deadline.is_none());
        assert_eq!(confirmed.total_price, record.total_price);
        // 已确认的预订继续占座
        assert!(is_held(&manager, 1, 1));

        let again = manager.confirm_payment(&record.id, "slip-002.jpg").unwrap_err();
        assert!(matches!(again, BookingError::InvalidState { .. }));
    }

    #[test]
    fn test_confirm_after_deadline_before_sweep() {
        let (manager, clock) = setup();
        let record = manager
            .create_booking(customer("Late"), seats(1, [1]))
            .unwrap();

        clock.advance_millis(WINDOW_MS + 1);
        let err = manager.confirm_payment(&record.id, "slip.jpg").unwrap_err();
        assert!(matches!(err, BookingError::DeadlineExpired { .. }));

        // 没有任何修改
        let unchanged = manager.get_booking(&record.id).unwrap();
        assert_eq!(unchanged.status, BookingStatus::PendingPayment);
        assert!(is_held(&manager, 1, 1));
    }

    #[test]
    fn test_scenario_e_confirm_after_sweep() {
        let (manager, clock) = setup();
        let record = manager
            .create_booking(customer("Late"), seats(4, [1, 2]))
            .unwrap();

        clock.advance_millis(WINDOW_MS + 1);
        let expired = manager.sweep_expired().unwrap();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].status, BookingStatus::PaymentTimeout);
        assert!(!is_held(&manager, 4, 1));

        let err = manager.confirm_payment(&record.id, "slip.jpg").unwrap_err();
        assert!(matches!(
            err,
            BookingError::InvalidState {
                status: BookingStatus::PaymentTimeout,
                ..
            }
        ));
    }

    #[test]
    fn test_expire_is_idempotent() {
        let (manager, clock) = setup();
        let record = manager
            .create_booking(customer("Nok"), seats(1, [5]))
            .unwrap();
        clock.advance_millis(WINDOW_MS + 1);

        let first = manager.expire_booking(&record.id).unwrap();
        assert!(first.is_some());
        let after_first = manager.get_booking(&record.id).unwrap();

        assert!(manager.expire_booking(&record.id).unwrap().is_none());
        assert_eq!(manager.get_booking(&record.id).unwrap(), after_first);
        assert!(manager.sweep_expired().unwrap().is_empty());
    }

    #[test]
    fn test_expire_before_deadline_is_noop() {
        let (manager, clock) = setup();
        let record = manager
            .create_booking(customer("Nok"), seats(1, [5]))
            .unwrap();

        clock.advance_millis(WINDOW_MS);
        assert!(manager.expire_booking(&record.id).unwrap().is_none());
        assert!(manager.sweep_expired().unwrap().is_empty());
        assert!(is_held(&manager, 1, 5));
    }

    #[test]
    fn test_expire_does_not_touch_confirmed() {
        let (manager, clock) = setup();
        let record = manager
            .create_booking(customer("Nok"), seats(1, [5]))
            .unwrap();
        manager.confirm_payment(&record.id, "slip.jpg").unwrap();

        clock.advance_millis(WINDOW_MS * 2);
        assert!(manager.expire_booking(&record.id).unwrap().is_none());
        assert_eq!(
            manager.get_booking(&record.id).unwrap().status,
            BookingStatus::Confirmed
        );
    }

    #[test]
    fn test_released_seats_can_be_rebooked() {
        let (manager, _) = setup();
        let first = manager
            .create_booking(customer("First"), seats(3, [1, 2]))
            .unwrap();
        manager
            .cancel_booking(&first.id, CancelledBy::Customer)
            .unwrap();

        let second = manager
            .create_booking(customer("Second"), seats(3, [2, 3]))
            .unwrap();
        assert_eq!(second.status, BookingStatus::PendingPayment);
    }

    #[test]
    fn test_cancel_rules() {
        let (manager, _) = setup();
        let record = manager
            .create_booking(customer("Nok"), seats(1, [1]))
            .unwrap();
        manager.confirm_payment(&record.id, "slip.jpg").unwrap();

        // 已确认 (终态) 不可取消
        for by in [CancelledBy::Customer, CancelledBy::Admin] {
            assert!(matches!(
                manager.cancel_booking(&record.id, by).unwrap_err(),
                BookingError::InvalidState { .. }
            ));
        }

        assert!(matches!(
            manager
                .cancel_booking("missing", CancelledBy::Admin)
                .unwrap_err(),
            BookingError::NotFound(_)
        ));
    }

    #[test]
    fn test_legacy_pending_only_admin_can_cancel() {
        let (manager, _) = setup();
        let mut record = manager
            .create_booking(customer("Legacy"), seats(2, [4]))
            .unwrap();

        // 模拟旧数据的 pending 状态
        let txn = manager.storage().begin_write().unwrap();
        record.status = BookingStatus::Pending;
        manager.storage().put_booking(&txn, &record).unwrap();
        txn.commit().unwrap();

        assert!(matches!(
            manager.confirm_payment(&record.id, "slip.jpg").unwrap_err(),
            BookingError::InvalidState { .. }
        ));
        assert!(matches!(
            manager
                .cancel_booking(&record.id, CancelledBy::Customer)
                .unwrap_err(),
            BookingError::InvalidState { .. }
        ));

        let cancelled = manager
            .cancel_booking(&record.id, CancelledBy::Admin)
            .unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert!(!is_held(&manager, 2, 4));
    }

    #[test]
    fn test_update_details_leaves_status_seats_total() {
        let (manager, _) = setup();
        let record = manager
            .create_booking(customer("Nok"), seats(1, [1, 2]))
            .unwrap();

        let updated = manager
            .update_booking_details(
                &record.id,
                BookingUpdate {
                    customer_name: Some("Nok Jaidee".to_string()),
                    phone: None,
                    notes: Some("window seat".to_string()),
                },
            )
            .unwrap();
        assert_eq!(updated.customer_name, "Nok Jaidee");
        assert_eq!(updated.phone, record.phone);
        assert_eq!(updated.notes.as_deref(), Some("window seat"));
        assert_eq!(updated.status, record.status);
        assert_eq!(updated.seats, record.seats);
        assert_eq!(updated.total_price, record.total_price);

        let err = manager
            .update_booking_details(
                &record.id,
                BookingUpdate {
                    phone: Some("".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));
    }

    #[test]
    fn test_total_price_not_recomputed_after_policy_change() {
        let (manager, _) = setup();
        let record = manager
            .create_booking(customer("Nok"), seats(1, [1]))
            .unwrap();

        let txn = manager.storage().begin_write().unwrap();
        let mut zone = manager.storage().get_zone_txn(&txn, "A").unwrap().unwrap();
        zone.seat_price = Decimal::from(999);
        manager.storage().put_zone(&txn, &zone).unwrap();
        txn.commit().unwrap();

        let confirmed = manager.confirm_payment(&record.id, "slip.jpg").unwrap();
        assert_eq!(confirmed.total_price, Decimal::from(150));
    }

    #[test]
    fn test_delete_releases_seats() {
        let (manager, _) = setup();
        let record = manager
            .create_booking(customer("Nok"), seats(6, [7, 8]))
            .unwrap();

        manager.delete_booking(&record.id).unwrap();
        assert!(!is_held(&manager, 6, 7));
        assert!(matches!(
            manager.get_booking(&record.id).unwrap_err(),
            BookingError::NotFound(_)
        ));
        assert_eq!(manager.storage().pending_count().unwrap(), 0);
    }

    #[test]
    fn test_delete_cancelled_keeps_new_holder() {
        let (manager, _) = setup();
        let old = manager
            .create_booking(customer("Nok"), seats(6, [1]))
            .unwrap();
        manager.cancel_booking(&old.id, CancelledBy::Customer).unwrap();
        let new = manager
            .create_booking(customer("Malee"), seats(6, [1]))
            .unwrap();

        manager.delete_booking(&old.id).unwrap();
        assert!(is_held(&manager, 6, 1));
        assert_eq!(
            manager.get_booking(&new.id).unwrap().status,
            BookingStatus::PendingPayment
        );
    }

    #[test]
    fn test_list_filters() {
        let (manager, _) = setup();
        let a = manager
            .create_booking(customer("Somchai"), seats(1, [1]))
            .unwrap();
        manager
            .create_booking(customer("Malee"), seats(1, [2]))
            .unwrap();
        manager.confirm_payment(&a.id, "slip.jpg").unwrap();

        let confirmed = manager
            .list_bookings(&BookingFilter {
                status: Some(BookingStatus::Confirmed),
                search: None,
            })
            .unwrap();
        assert_eq!(confirmed.len(), 1);
        assert_eq!(confirmed[0].id, a.id);

        let by_name = manager
            .list_bookings(&BookingFilter {
                status: None,
                search: Some("MALEE".to_string()),
            })
            .unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].customer_name, "Malee");
    }

    #[tokio::test]
    async fn test_events_published_after_commit() {
        let (manager, clock) = setup();
        let mut rx = manager.subscribe();

        let record = manager
            .create_booking(customer("Nok"), seats(1, [1]))
            .unwrap();
        clock.advance_millis(WINDOW_MS + 1);
        manager.sweep_expired().unwrap();

        let created = rx.recv().await.unwrap();
        assert_eq!(created.kind, BookingEventKind::Created);
        assert_eq!(created.booking_id, record.id);

        let expired = rx.recv().await.unwrap();
        assert_eq!(expired.kind, BookingEventKind::Expired);
        assert_eq!(expired.status, BookingStatus::PaymentTimeout);
    }

    #[test]
    fn test_rejected_booking_publishes_nothing() {
        let (manager, _) = setup();
        manager
            .create_booking(customer("First"), seats(1, [1]))
            .unwrap();
        let mut rx = manager.subscribe();

        manager
            .create_booking(customer("Second"), seats(1, [1]))
            .unwrap_err();
        assert!(rx.try_recv().is_err());
    }
}
