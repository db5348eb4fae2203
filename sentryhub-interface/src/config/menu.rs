use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use sentryhub_core::menu::{MenuDefinition, MenuItem};

use super::ConfigError;

/// On-disk shape of the menu document
#[derive(Debug, Deserialize)]
struct MenuFile {
    menus: BTreeMap<String, Vec<MenuItem>>,
}

/// Parse and validate a menu document
pub fn parse_menu(text: &str, path: &Path) -> Result<MenuDefinition, ConfigError> {
    let file: MenuFile = toml::from_str(text).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(MenuDefinition::new(file.menus)?)
}

/// Read, parse and validate the menu document at `path`
pub fn load_menu(path: &Path) -> Result<MenuDefinition, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let definition = parse_menu(&text, path)?;
    info!("loaded {} menus from {}", definition.len(), path.display());
    debug!(
        "menus: {}",
        definition.menu_names().collect::<Vec<_>>().join(", ")
    );
    Ok(definition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentryhub_core::menu::{
        Action, AlertLevel, ChoiceGroup, DefinitionError, Generator, MenuId, Query,
        RefreshPolicy, Setting,
    };

    fn parse(text: &str) -> Result<MenuDefinition, ConfigError> {
        parse_menu(text, Path::new("menu.toml"))
    }

    #[test]
    fn test_every_item_type_parses() {
        let def = parse(
            r#"
            [[menus.main]]
            type = "dynamic"
            text = "SSID: {ssid}"
            function = "wifi_ssid"
            refresh = 10

            [[menus.main]]
            type = "dynamic"
            text = "IP: {ip}"
            function = "ip_address"
            refresh = "on_navigate"

            [[menus.main]]
            type = "submenu"
            text = "Settings"
            submenu = "settings"

            [[menus.main]]
            type = "dynamic_submenu"
            text = "Wi-Fi"
            generator = "network_scan"

            [[menus.main]]
            type = "sensor_summary"
            text = "Sensors: {n}"
            refresh = 30

            [[menus.main]]
            type = "action"
            text = "Sleep"
            action = "blank_display"

            [[menus.settings]]
            type = "brightness_bar"
            text = "Display"
            setting = "display_brightness"

            [[menus.settings]]
            type = "editable"
            text = "LED: {v}"
            setting = "led_brightness"
            min = 0
            max = 255

            [[menus.settings]]
            type = "hue_bar"
            text = "Warning hue"
            level = "warning"

            [[menus.settings]]
            type = "checkbox"
            text = "{x} Left"
            group = "orientation"
            value = 0

            [[menus.settings]]
            type = "static"
            text = "Version"
            right = "1.0"

            [[menus.settings]]
            type = "back"
            "#,
        )
        .unwrap();

        let main = def.get("main").unwrap();
        assert_eq!(main.len(), 6);
        assert!(matches!(
            &main[0],
            MenuItem::Dynamic {
                function: Query::WifiSsid,
                refresh: RefreshPolicy::Seconds(10),
                ..
            }
        ));
        assert!(matches!(
            &main[1],
            MenuItem::Dynamic {
                refresh: RefreshPolicy::OnNavigate,
                ..
            }
        ));
        assert!(matches!(
            &main[2],
            MenuItem::Submenu { submenu, .. } if *submenu == MenuId::named("settings")
        ));
        assert!(matches!(
            &main[3],
            MenuItem::DynamicSubmenu {
                generator: Generator::NetworkScan,
                ..
            }
        ));
        assert!(matches!(
            &main[5],
            MenuItem::Action {
                action: Action::BlankDisplay,
                ..
            }
        ));

        let settings = def.get("settings").unwrap();
        assert!(matches!(
            &settings[0],
            MenuItem::BrightnessBar {
                setting: Setting::DisplayBrightness,
                min: 0,
                max: 255,
                ..
            }
        ));
        assert!(matches!(
            &settings[2],
            MenuItem::HueBar {
                level: AlertLevel::Warning,
                ..
            }
        ));
        assert!(matches!(
            &settings[3],
            MenuItem::Checkbox {
                group: ChoiceGroup::Orientation,
                value: 0,
                ..
            }
        ));
        assert_eq!(settings[5].text(), "Back");
    }

    #[test]
    fn test_unknown_function_rejected() {
        let err = parse(
            r#"
            [[menus.main]]
            type = "dynamic"
            text = "{x}"
            function = "cpu_temperature"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));
    }

    #[test]
    fn test_dangling_submenu_rejected() {
        let err = parse(
            r#"
            [[menus.main]]
            type = "submenu"
            text = "Network"
            submenu = "network"
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Definition(DefinitionError::UnknownSubmenu { .. })
        ));
    }

    #[test]
    fn test_missing_root_rejected() {
        let err = parse(
            r#"
            [[menus.other]]
            type = "back"
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Definition(DefinitionError::MissingRoot)
        ));
    }

    #[test]
    fn test_shipped_menu_is_valid() {
        let text = include_str!("../../config/menu.toml");
        let def = parse(text).unwrap();
        assert!(def.contains("main"));
    }
}
