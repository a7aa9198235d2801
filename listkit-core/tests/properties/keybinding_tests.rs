//! Property tests for keyboard command bindings

use std::collections::HashMap;

use listkit_core::config::keybindings::{
    KeybindingSettings, ListCommand, default_keybindings, is_valid_accelerator,
};
use listkit_core::{
    CommandOutcome, CoordinatorSettings, FocusBroker, ListCoordinator, ListKind, ManualScheduler,
};
use proptest::prelude::*;

/// Accelerators none of the defaults use
fn free_accel() -> impl Strategy<Value = String> {
    let modifiers = prop::sample::select(vec!["", "<Control>", "<Alt>", "<Control><Shift>"]);
    let keys = prop::sample::select(vec!["j", "k", "d", "F2", "Page_Down", "Home"]);
    (modifiers, keys).prop_map(|(modifier, key)| format!("{modifier}{key}"))
}

fn any_command() -> impl Strategy<Value = ListCommand> {
    prop::sample::select(ListCommand::all().to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A rebound action answers to the new accelerator and no longer to its defaults
    #[test]
    fn rebinding_moves_the_command(command in any_command(), accel in free_accel()) {
        let mut settings = KeybindingSettings::default();
        settings.overrides.insert(command.action().to_string(), accel.clone());

        prop_assert_eq!(settings.command_for_accel(&accel), Some(command));
        let defs = default_keybindings();
        let def = defs.iter().find(|d| d.command() == Some(command)).unwrap();
        for old in def.default_accel_list() {
            prop_assert_ne!(settings.command_for_accel(old), Some(command));
        }

        settings.reset(command.action());
        prop_assert_eq!(settings.command_for_accel(&accel), None);
    }

    /// Overrides built from free accelerators always validate
    #[test]
    fn generated_overrides_validate(
        overrides in prop::collection::hash_map(
            any_command().prop_map(|c| c.action().to_string()),
            free_accel(),
            0..6,
        ),
    ) {
        let settings = KeybindingSettings { overrides };
        prop_assert!(settings.invalid_overrides().is_empty());
        prop_assert_eq!(settings.has_overrides(), !settings.overrides.is_empty());
    }

    /// Overrides survive a trip through the TOML settings file
    #[test]
    fn overrides_survive_settings_file(command in any_command(), accel in free_accel()) {
        let mut settings = CoordinatorSettings::default();
        settings
            .keybindings
            .overrides
            .insert(command.action().to_string(), accel.clone());

        let text = settings.to_toml_string().unwrap();
        let loaded = CoordinatorSettings::from_toml_str(&text).unwrap();
        prop_assert_eq!(loaded.keybindings.command_for_accel(&accel), Some(command));
    }

    /// A modifier group without a key is never an accelerator
    #[test]
    fn modifiers_alone_are_rejected(
        modifiers in prop::collection::vec(
            prop::sample::select(vec!["<Control>", "<Shift>", "<Alt>", "<Super>"]),
            1..4,
        ),
    ) {
        prop_assert!(!is_valid_accelerator(&modifiers.concat()));
    }
}

#[test]
fn every_default_accelerator_reaches_its_command() {
    let settings = KeybindingSettings::default();
    for def in default_keybindings() {
        for accel in def.default_accel_list() {
            assert_eq!(settings.command_for_accel(accel), def.command(), "{accel}");
        }
    }
}

#[test]
fn coordinator_uses_configured_bindings() {
    let mut settings = CoordinatorSettings::default();
    settings.keybindings = KeybindingSettings {
        overrides: HashMap::from([("list.select-all".to_string(), "<Control>l".to_string())]),
    };
    let items: Vec<String> = vec!["a".into(), "b".into()];
    let mut coordinator: ListCoordinator<String, ManualScheduler> = ListCoordinator::new(
        ListKind::Commands,
        &settings,
        FocusBroker::new(),
        ManualScheduler::new(),
    );

    assert_eq!(coordinator.handle_accel("<Control>a", &items), CommandOutcome::Unhandled);
    assert_eq!(
        coordinator.handle_accel("<Control>l", &items),
        CommandOutcome::SelectionChanged
    );
    assert_eq!(coordinator.selection().selection_count(), 2);
}
