use shared::{
    domain::{Sector, SectorFields},
    error::Notice,
};
use storage::SlotStore;

use crate::{
    store::StateStore,
    view::{log_activity, FormView},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorSaved {
    pub sector: Sector,
    pub fields: usize,
}

/// Reads every field of the sector form by identifier. A form that is not
/// rendered reads as empty.
pub fn capture_sector<V: FormView + ?Sized>(view: &V, sector: Sector) -> SectorFields {
    view.sector_fields(sector)
        .unwrap_or_default()
        .into_iter()
        .map(|field| (field.id, field.value))
        .collect()
}

pub fn save_sector<S: SlotStore, V: FormView + ?Sized>(
    store: &mut StateStore<S>,
    view: &mut V,
    sector: Sector,
) -> SectorSaved {
    let data = capture_sector(view, sector);
    let fields = data.len();
    store.set_sector_data(sector, data);

    let label = sector.label();
    log_activity(store, view, format!("Updated {label} sector data"));
    view.notify(&Notice::info(format!("{label} data saved successfully!")));

    SectorSaved { sector, fields }
}
