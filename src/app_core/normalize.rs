//! Vehicle list normalization: deduplication by ID and display ordering.

use crate::model::{VehicleId, VehicleRecord};
use foldhash::HashMap;
use std::cmp::Ordering;

/// Deduplicates `records` by [`VehicleId`] and sorts them for display.
///
/// A later record with an already-seen ID replaces the earlier one in place,
/// so each ID keeps the slot of its first occurrence but the content of its
/// last. The stable sort then orders by tier descending, battle rating
/// descending; records that tie on both keep that slot order.
pub fn normalize(records: Vec<VehicleRecord>) -> Vec<VehicleRecord> {
    let mut slots: HashMap<VehicleId, usize> = HashMap::default();
    slots.reserve(records.len());
    let mut unique: Vec<VehicleRecord> = Vec::with_capacity(records.len());

    for record in records {
        match slots.get(&record.vehicle_id) {
            Some(&slot) => unique[slot] = record,
            None => {
                slots.insert(record.vehicle_id.clone(), unique.len());
                unique.push(record);
            }
        }
    }

    unique.sort_by(display_order);
    unique
}

/// Tier descending, then battle rating descending. NaN ratings compare equal.
pub fn display_order(a: &VehicleRecord, b: &VehicleRecord) -> Ordering {
    b.tier.cmp(&a.tier).then_with(|| {
        b.battle_rating
            .partial_cmp(&a.battle_rating)
            .unwrap_or(Ordering::Equal)
    })
}
