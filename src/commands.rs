//! Command implementations for the gunsmith CLI

use std::path::PathBuf;

use anyhow::{Context, Result};
use gunsmith_builder::{
    format_fire_modes, Build, BuildId, BuildRepository, BuildSession, CatalogIndex, ItemId,
    JsonFileStore, SlotPath, StatDelta,
};
use gunsmith_integration::IntegrationClient;
use tracing::{info, warn};

use crate::settings::Settings;

/// One `--equip path=mod-id` argument
#[derive(Debug, Clone, PartialEq)]
pub struct EquipArg {
    pub path: SlotPath,
    pub id: ItemId,
}

/// Parse `Muzzle.Suppressor=5a9fbb84a2750c00137fa685`
pub fn parse_equip(arg: &str) -> Result<EquipArg, String> {
    let (path, id) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected <slot-path>=<mod-id>, got '{}'", arg))?;
    let path = SlotPath::parse(path.trim()).map_err(|e| e.to_string())?;
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing modification id in '{}'", arg));
    }
    Ok(EquipArg { path, id: id.into() })
}

/// Fetch the provider data once and index it
pub fn load_catalog(settings: &Settings) -> Result<CatalogIndex> {
    let client = IntegrationClient::new(settings.api.client_config())
        .context("Failed to start game-data client")?;
    info!("Fetching weapons and modifications from {}", settings.api.endpoint);
    let items = client.fetch_items().wait()?;
    Ok(CatalogIndex::load(items)?)
}

pub fn open_repository(settings: &Settings) -> Result<BuildRepository<JsonFileStore>> {
    let path: PathBuf = settings
        .storage
        .builds_path()
        .context("Could not determine data directory for saved builds")?;
    Ok(BuildRepository::open(JsonFileStore::new(path))?)
}

/// A session on `weapon_id` with `equips` applied parents-first
pub fn build_session(catalog: &CatalogIndex, weapon_id: &str, equips: &[EquipArg]) -> Result<BuildSession> {
    let weapon = catalog
        .weapon_by_id(&ItemId::from(weapon_id))
        .with_context(|| format!("Unknown weapon '{}'", weapon_id))?;

    let mut session = BuildSession::new();
    session.select_weapon(weapon.clone());

    let mut ordered: Vec<&EquipArg> = equips.iter().collect();
    ordered.sort_by(|a, b| a.path.cmp(&b.path));
    for equip in ordered {
        session
            .equip_checked(catalog, equip.path.clone(), &equip.id)
            .with_context(|| format!("Cannot equip {} at {}", equip.id, equip.path))?;
    }
    Ok(session)
}

pub fn weapons(catalog: &CatalogIndex, search: &str, caliber: &str) {
    let weapons = catalog.weapons_by_caliber_filter(search, caliber);
    for weapon in &weapons {
        println!(
            "{:<28} {:<40} {:<22} ergo {:>3}  recoil {:>3}/{:<3}  {}",
            weapon.id,
            weapon.name,
            weapon.caliber,
            weapon.ergonomics,
            weapon.recoil_vertical,
            weapon.recoil_horizontal,
            format_fire_modes(&weapon.fire_modes),
        );
    }
    println!("{} weapons", weapons.len());
}

pub fn calibers(catalog: &CatalogIndex) {
    for caliber in catalog.calibers() {
        println!("{}", caliber);
    }
}

/// Print the slot tree with every equipped branch expanded
pub fn slots(catalog: &CatalogIndex, weapon_id: &str, equips: &[EquipArg]) -> Result<()> {
    let mut session = build_session(catalog, weapon_id, equips)?;
    let equipped: Vec<SlotPath> = session.tree().iter().map(|(path, _)| path.clone()).collect();
    for path in &equipped {
        session.toggle_expansion(path);
    }

    for row in session.visible_slots() {
        let options = gunsmith_builder::compatible_modifications(catalog, row.slot).len();
        let equipped = row
            .equipped
            .map(|m| format!(" = {} ({})", m.display_name(), m.id))
            .unwrap_or_default();
        println!(
            "{}{} <{}> [{} options]{}",
            "  ".repeat(row.depth),
            row.slot.display_name(),
            row.path,
            options,
            equipped
        );
    }
    Ok(())
}

pub fn compatible(
    catalog: &CatalogIndex,
    weapon_id: &str,
    slot: &SlotPath,
    search: &str,
    equips: &[EquipArg],
) -> Result<()> {
    let mut session = build_session(catalog, weapon_id, equips)?;
    if session.slot_at(slot).is_none() {
        anyhow::bail!("No slot at {}", slot);
    }
    session.open_picker(slot.clone());
    session.set_picker_search(search);

    let options = session.picker_options(catalog);
    for modification in &options {
        let recoil = modification
            .recoil_reduction_percent()
            .map(|p| format!("recoil -{}%", p))
            .unwrap_or_default();
        let nested = if modification.has_slots() {
            format!("{} slots", modification.slots.len())
        } else {
            String::new()
        };
        println!(
            "{:<28} {:<48} ergo {:>+3}  {:<12} {}",
            modification.id, modification.name, modification.ergonomics, recoil, nested
        );
    }
    println!("{} compatible modifications", options.len());
    Ok(())
}

fn print_stats(session: &BuildSession) {
    let (Some(stats), Some(delta)) = (session.stats(), session.stat_delta()) else {
        return;
    };
    println!("Ergonomics:        {:>4} ({})", stats.ergonomics, signed(delta.ergonomics));
    println!("Vertical recoil:   {:>4} ({})", stats.recoil_vertical, signed(delta.recoil_vertical));
    println!("Horizontal recoil: {:>4} ({})", stats.recoil_horizontal, signed(delta.recoil_horizontal));
    println!("Recoil sum:        {:>4} ({})", stats.recoil_sum, signed(delta.recoil_sum));
    print_trend(&delta);
}

fn print_trend(delta: &StatDelta) {
    if delta.improves_ergonomics() {
        println!("Handling improved");
    }
    if delta.improves_recoil() {
        println!("Recoil reduced");
    }
}

fn signed(value: i32) -> String {
    format!("{:+}", value)
}

pub fn stats(catalog: &CatalogIndex, weapon_id: &str, equips: &[EquipArg]) -> Result<()> {
    let session = build_session(catalog, weapon_id, equips)?;
    if let Some(weapon) = session.weapon() {
        println!("{} ({})", weapon.name, weapon.caliber);
    }
    print_stats(&session);
    Ok(())
}

pub fn list_builds(repo: &BuildRepository<JsonFileStore>) {
    if repo.list().is_empty() {
        println!("No saved builds");
        return;
    }
    for build in repo.list() {
        println!(
            "{}  {:<24} {:<32} ergo {:>3}  recoil {:>3}  {}",
            build.id,
            build.name,
            build.weapon.display_name(),
            build.stats.ergonomics,
            build.stats.recoil_sum,
            build.created_at.format("%Y-%m-%d %H:%M"),
        );
    }
}

pub fn save_build(
    catalog: &CatalogIndex,
    repo: &mut BuildRepository<JsonFileStore>,
    name: &str,
    weapon_id: &str,
    equips: &[EquipArg],
) -> Result<Build> {
    let mut session = build_session(catalog, weapon_id, equips)?;
    session.set_build_name(name);
    let build = session.save(repo)?;
    println!("Saved build '{}' as {}", build.name, build.id);
    Ok(build)
}

pub fn show_build(repo: &BuildRepository<JsonFileStore>, id: &str) -> Result<()> {
    let id: BuildId = id.parse().with_context(|| format!("Invalid build id '{}'", id))?;
    let mut session = BuildSession::new();
    session.load_build(repo.load(id)?);

    println!("Build '{}'", session.build_name());
    if let Some(weapon) = session.weapon() {
        println!("{} ({})", weapon.name, weapon.caliber);
    }
    for (path, modification) in session.tree().iter() {
        println!("  {} = {}", path, modification.name);
    }
    print_stats(&session);
    Ok(())
}

pub fn delete_build(repo: &mut BuildRepository<JsonFileStore>, id: &str) -> Result<()> {
    let id: BuildId = id.parse().with_context(|| format!("Invalid build id '{}'", id))?;
    if repo.delete(id)? {
        println!("Deleted build {}", id);
    } else {
        warn!("No saved build with id {}", id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gunsmith_builder::{ModificationRecord, SlotDefinition, WeaponRecord};

    fn slot(name: &str, allowed: &[&str]) -> SlotDefinition {
        let mut slot = SlotDefinition::new(name);
        slot.allowed = allowed.iter().map(|id| ItemId::from(*id)).collect();
        slot
    }

    fn modification(id: &str, slots: Vec<SlotDefinition>) -> ModificationRecord {
        ModificationRecord {
            id: id.into(),
            name: id.to_uppercase(),
            short_name: None,
            ergonomics: -2,
            recoil_multiplier: Some(0.9),
            slots,
        }
    }

    fn catalog() -> CatalogIndex {
        let weapon = WeaponRecord {
            id: "m4".into(),
            name: "M4A1".to_string(),
            short_name: None,
            caliber: "Caliber556x45NATO".to_string(),
            ergonomics: 50,
            recoil_vertical: 100,
            recoil_horizontal: 200,
            slots: vec![slot("Muzzle", &["adapter"])],
            fire_rate: Some(800),
            fire_modes: Vec::new(),
            effective_distance: None,
            default_ammo: None,
        };
        CatalogIndex::from_records(
            vec![weapon],
            vec![
                modification("adapter", vec![slot("Suppressor", &["sup"])]),
                modification("sup", Vec::new()),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_parse_equip() {
        let arg = parse_equip("Muzzle.Suppressor=abc123").unwrap();
        assert_eq!(arg.path.to_string(), "Muzzle.Suppressor");
        assert_eq!(arg.id, ItemId::from("abc123"));
    }

    #[test]
    fn test_parse_equip_rejects_malformed() {
        assert!(parse_equip("Muzzle").is_err());
        assert!(parse_equip("Muzzle=").is_err());
        assert!(parse_equip("=abc").is_err());
        assert!(parse_equip("Muzzle..Suppressor=abc").is_err());
    }

    #[test]
    fn test_build_session_orders_parents_first() {
        let catalog = catalog();
        let equips = vec![
            parse_equip("Muzzle.Suppressor=sup").unwrap(),
            parse_equip("Muzzle=adapter").unwrap(),
        ];
        let session = build_session(&catalog, "m4", &equips).unwrap();
        assert_eq!(session.tree().len(), 2);
        let stats = session.stats().unwrap();
        assert_eq!(stats.ergonomics, 46);
        assert_eq!(stats.recoil_vertical, 81);
        assert_eq!(stats.recoil_horizontal, 162);
    }

    #[test]
    fn test_build_session_unknown_weapon() {
        assert!(build_session(&catalog(), "ak", &[]).is_err());
    }

    #[test]
    fn test_build_session_incompatible() {
        let equips = vec![parse_equip("Muzzle=sup").unwrap()];
        assert!(build_session(&catalog(), "m4", &equips).is_err());
    }
}
