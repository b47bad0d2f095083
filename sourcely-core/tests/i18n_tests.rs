use std::sync::Arc;

use serde_json::json;
use sourcely_core::storage::LANGUAGE_KEY;
use sourcely_core::{ClientStorage, Lang, LanguageContext, MemoryStorage, Translator};

fn locales_dir() -> String {
    format!("{}/tests/locales", env!("CARGO_MANIFEST_DIR"))
}

fn translator() -> Translator {
    Translator::load_dir(locales_dir()).unwrap()
}

#[test]
fn loads_all_three_languages_and_ignores_other_files() {
    assert_eq!(translator().languages(), vec![Lang::En, Lang::Bn, Lang::Zh]);
}

#[test]
fn navbar_home_falls_back_from_bengali_to_english() {
    let t = translator();
    assert_eq!(t.resolve("navbar.home", Lang::En, None).as_ref(), &json!("Home"));
    assert_eq!(t.resolve("navbar.home", Lang::Bn, None).as_ref(), &json!("Home"));
    assert_eq!(t.resolve("navbar.home", Lang::Zh, None).as_ref(), &json!("首页"));
}

#[test]
fn stored_values_come_back_unchanged() {
    let t = translator();
    let dict = t.dictionary(Lang::Zh).unwrap();
    for key in ["navbar", "services.items", "services.title"] {
        assert_eq!(t.resolve(key, Lang::Zh, None).as_ref(), dict.get(key).unwrap());
    }
}

#[test]
fn missing_everywhere_returns_fallback_or_key() {
    let t = translator();
    assert_eq!(t.resolve("gifts.title", Lang::Bn, Some("Gifts")).as_ref(), &json!("Gifts"));
    assert_eq!(t.resolve("gifts.title", Lang::Bn, None).as_ref(), &json!("gifts.title"));
}

#[test]
fn bengali_gaps_are_reported() {
    let gaps = translator().coverage_gaps();
    assert!(gaps.contains(&(Lang::Bn, "navbar.home".to_string())));
    assert!(gaps.contains(&(Lang::Bn, "contact.whatsapp".to_string())));
    assert!(!gaps.iter().any(|(lang, _)| *lang == Lang::Zh));
}

#[test]
fn missing_directory_is_an_error() {
    assert!(Translator::load_dir("/this/path/should/not/exist").is_err());
}

#[test]
fn language_switch_drives_resolution() {
    let t = translator();
    let storage = Arc::new(MemoryStorage::new());
    let ctx = LanguageContext::restore(storage.clone());

    assert_eq!(t.text("services.title", ctx.current()), "Our Services");

    ctx.set_language(Lang::Bn);
    assert_eq!(t.text("services.title", ctx.current()), "আমাদের সেবা");
    assert_eq!(
        t.format("contact.whatsapp", ctx.current(), &[("name", "Sourcely")]),
        "Chat with Sourcely on WhatsApp"
    );
    assert_eq!(storage.get(LANGUAGE_KEY).unwrap().as_deref(), Some("bn"));
    assert_eq!(ctx.font_class(), Some("font-bengali"));
}
