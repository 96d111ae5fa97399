//! Shared record builders for unit tests

use crate::record::{ModificationRecord, SlotDefinition, WeaponRecord};

pub fn make_slot(name: &str, allowed: &[&str]) -> SlotDefinition {
    let mut slot = SlotDefinition::new(name);
    slot.allowed = allowed.iter().map(|id| (*id).into()).collect();
    slot
}

pub fn make_weapon(ergonomics: i32, recoil_v: i32, recoil_h: i32, slots: &[&str]) -> WeaponRecord {
    WeaponRecord {
        id: "w1".into(),
        name: "Test Rifle".to_string(),
        short_name: None,
        caliber: "Caliber556x45NATO".to_string(),
        ergonomics,
        recoil_vertical: recoil_v,
        recoil_horizontal: recoil_h,
        slots: slots.iter().map(|name| make_slot(name, &[])).collect(),
        fire_rate: Some(800),
        fire_modes: vec!["Single fire".to_string(), "Full Auto".to_string()],
        effective_distance: Some(500),
        default_ammo: None,
    }
}

pub fn make_mod(
    id: &str,
    ergonomics: i32,
    recoil_multiplier: Option<f64>,
    slots: &[&str],
) -> ModificationRecord {
    ModificationRecord {
        id: id.into(),
        name: format!("Mod {}", id),
        short_name: None,
        ergonomics,
        recoil_multiplier,
        slots: slots.iter().map(|name| make_slot(name, &[])).collect(),
    }
}
