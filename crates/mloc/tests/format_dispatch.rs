//! Integration tests for `format` dispatch precedence.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use mloc::{
    Formattable, Formatter, Locale, LocaleOps, LocalizedFormat, TypeKey, Value, config,
};

/// A value with a self-formatting capability.
struct Money {
    cents: i64,
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} cents", self.cents)
    }
}

impl LocalizedFormat for Money {
    fn localized_format(&self, locale: &Locale, fmt: Option<&str>) -> String {
        let symbol = locale.get_str("currency.symbol").unwrap_or_default();
        let amount = format!("{}.{:02}", self.cents / 100, self.cents % 100);
        match fmt {
            Some("code") => format!("{amount} {}", locale.get_str("currency.code").unwrap_or_default()),
            _ => format!("{symbol}{amount}"),
        }
    }
}

impl Formattable for Money {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_localized(&self) -> Option<&dyn LocalizedFormat> {
        Some(self)
    }
}

/// A value without any capability beyond `Display`.
struct Plain(u8);

impl fmt::Display for Plain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "plain-{}", self.0)
    }
}

impl Formattable for Plain {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn en_us() -> Arc<Locale> {
    Arc::new(
        Locale::builder()
            .name("en-US")
            .config(config! { "currency.symbol" => "$", "currency.code" => "USD" })
            .build()
            .unwrap(),
    )
}

// =========================================================================
// Precedence
// =========================================================================

#[test]
fn registered_formatter_beats_self_formatting() {
    let locale = en_us();
    locale.register_formatter_for::<Money>(Formatter::typed(|money: &Money, _, _| {
        format!("registered {}", money.cents)
    }));

    assert_eq!(
        locale.format(&Money { cents: 150 }, None, None, None),
        "registered 150"
    );
}

#[test]
fn self_formatting_used_without_registered_formatter() {
    let locale = en_us();
    assert_eq!(locale.format(&Money { cents: 150 }, None, None, None), "$1.50");
}

#[test]
fn display_used_without_formatter_or_capability() {
    let locale = en_us();
    assert_eq!(locale.format(&Plain(7), None, None, None), "plain-7");
    assert_eq!(locale.format(&42_i64, None, None, None), "42");
    assert_eq!(locale.format(&Value::from(vec![1, 2]), None, None, None), "[1, 2]");
}

#[test]
fn default_formatter_beats_self_formatting() {
    let locale = en_us();
    let default = Formatter::new(|value, _, _| format!("default({value})"));

    assert_eq!(
        locale.format(&Money { cents: 5 }, None, Some(&default), None),
        "default(5 cents)"
    );
}

#[test]
fn registered_formatter_beats_default_formatter() {
    let locale = en_us();
    locale.register_formatter_for::<Plain>(Formatter::new(|_, _, _| "registered".to_string()));
    let default = Formatter::new(|_, _, _| "default".to_string());

    assert_eq!(locale.format(&Plain(1), None, Some(&default), None), "registered");
}

// =========================================================================
// Dispatch Keys
// =========================================================================

#[test]
fn type_key_is_stable_and_distinct() {
    assert_eq!(Plain(1).type_key(), Plain(2).type_key());
    assert_ne!(Plain(1).type_key(), Money { cents: 1 }.type_key());
    assert_eq!(Plain(1).type_key(), TypeKey::of::<Plain>());
    assert!(TypeKey::of::<Plain>().as_str().ends_with("Plain"));
}

#[test]
fn type_key_through_trait_object_names_concrete_type() {
    let values: Vec<Box<dyn Formattable>> = vec![Box::new(Plain(1)), Box::new(3_u32)];
    assert_eq!(values[0].type_key(), TypeKey::of::<Plain>());
    assert_eq!(values[1].type_key(), TypeKey::of::<u32>());
}

#[test]
fn explicit_formatter_id_overrides_type_key() {
    let locale = en_us();
    locale.register_formatter_for::<i64>(Formatter::new(|_, _, _| "by type".to_string()));
    locale.register_formatter("percent", Formatter::new(|value, _, _| format!("{value}%")));

    assert_eq!(locale.format(&12_i64, None, None, None), "by type");
    assert_eq!(locale.format(&12_i64, None, None, Some("percent")), "12%");
}

#[test]
fn empty_formatter_id_falls_back_to_type_key() {
    let locale = en_us();
    locale.register_formatter_for::<i64>(Formatter::new(|_, _, _| "by type".to_string()));
    assert_eq!(locale.format(&12_i64, None, None, Some("")), "by type");
}

#[test]
fn unknown_formatter_id_uses_capability_then_display() {
    let locale = en_us();
    assert_eq!(
        locale.format(&Money { cents: 99 }, None, None, Some("missing")),
        "$0.99"
    );
    assert_eq!(locale.format(&Plain(3), None, None, Some("missing")), "plain-3");
}

#[test]
fn typed_formatter_falls_back_to_display_for_other_types() {
    let locale = en_us();
    locale.register_formatter(
        "money",
        Formatter::typed(|money: &Money, _, _| format!("M{}", money.cents)),
    );

    assert_eq!(locale.format(&Money { cents: 3 }, None, None, Some("money")), "M3");
    assert_eq!(locale.format(&Plain(3), None, None, Some("money")), "plain-3");
}

// =========================================================================
// Locale and Format Spec Plumbing
// =========================================================================

#[test]
fn format_spec_reaches_formatter() {
    let locale = en_us();
    locale.register_formatter_for::<f64>(Formatter::typed(|n: &f64, _, fmt| match fmt {
        Some("percent") => format!("{:.0}%", n * 100.0),
        _ => n.to_string(),
    }));

    assert_eq!(locale.format(&0.25_f64, Some("percent"), None, None), "25%");
    assert_eq!(locale.format(&0.25_f64, None, None, None), "0.25");
}

#[test]
fn format_spec_reaches_self_formatting() {
    let locale = en_us();
    assert_eq!(
        locale.format(&Money { cents: 1234 }, Some("code"), None, None),
        "12.34 USD"
    );
}

#[test]
fn formatter_receives_the_formatting_locale() {
    let en = en_us();
    en.register_formatter_for::<Plain>(Formatter::new(|_, locale, _| locale.name().to_string()));
    let child = Locale::builder()
        .name("en-CA")
        .fallback(Arc::clone(&en))
        .build()
        .unwrap();

    // Formatter found on the parent, but invoked with the child.
    assert_eq!(child.format(&Plain(0), None, None, None), "en-CA");
}

#[test]
fn self_formatting_resolves_config_through_fallback() {
    let en = en_us();
    let child = Locale::builder()
        .name("en-PR")
        .config(config! { "currency.code" => "USD-PR" })
        .fallback(en)
        .build()
        .unwrap();

    assert_eq!(child.format(&Money { cents: 100 }, None, None, None), "$1.00");
    assert_eq!(
        child.format(&Money { cents: 100 }, Some("code"), None, None),
        "1.00 USD-PR"
    );
}

#[test]
fn formatter_can_call_back_into_locale() {
    let locale = en_us();
    locale.register_formatter_for::<Money>(Formatter::typed(|money: &Money, locale, _| {
        // Nested format of a different type while this formatter runs.
        let cents = locale.format(&money.cents, None, None, None);
        format!("{}{cents}c", locale.get_str("currency.symbol").unwrap_or_default())
    }));

    assert_eq!(locale.format(&Money { cents: 5 }, None, None, None), "$5c");
}

// =========================================================================
// Resolved Configuration Values
// =========================================================================

#[test]
fn resolved_value_dispatches_on_the_type_it_holds() {
    let locale = Locale::builder()
        .name("de")
        .config(config! { "price" => 3.5, "count" => 4, "unit" => "kg" })
        .build()
        .unwrap();
    locale.register_formatter_for::<f64>(Formatter::typed(|n: &f64, _, _| {
        format!("{n:.2}").replace('.', ",")
    }));
    locale.register_formatter_for::<String>(Formatter::typed(|s: &String, _, _| {
        s.to_uppercase()
    }));

    let price = locale.get("price", None).unwrap();
    assert_eq!(locale.format(&price, None, None, None), "3,50");

    let unit = locale.get("unit", None).unwrap();
    assert_eq!(locale.format(&unit, None, None, None), "KG");

    // No formatter for i64: the value's own rendering.
    let count = locale.get("count", None).unwrap();
    assert_eq!(locale.format(&count, None, None, None), "4");
}

#[test]
fn value_type_keys_follow_the_variant() {
    assert_eq!(Value::from(1.5).type_key(), TypeKey::of::<f64>());
    assert_eq!(Value::from(2).type_key(), TypeKey::of::<i64>());
    assert_eq!(Value::from(true).type_key(), TypeKey::of::<bool>());
    assert_eq!(Value::from("x").type_key(), TypeKey::of::<String>());
    assert_eq!(Value::from(vec![1]).type_key(), TypeKey::of::<Vec<Value>>());
    assert_eq!(Value::Null.type_key(), TypeKey::of::<Value>());
}
