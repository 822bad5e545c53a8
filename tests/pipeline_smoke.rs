//! End-to-end scenarios through the full convert pipeline.

use card_ir::{
    AbilityType, Amount, CardRecord, EffectAction, FormatLegality, TargetClass, TriggerEvent,
    convert,
};

fn record(name: &str, type_line: &str, cmc: f64, oracle_text: &str) -> CardRecord {
    CardRecord {
        name: name.to_string(),
        type_line: type_line.to_string(),
        cmc,
        oracle_text: oracle_text.to_string(),
        ..CardRecord::default()
    }
}

#[test]
fn burn_spell_parses_to_one_damage_effect() {
    let ir = convert(
        &record(
            "Lightning Bolt",
            "Instant",
            1.0,
            "Deal 3 damage to any target.",
        ),
        FormatLegality::default(),
    )
    .unwrap();

    assert_eq!(ir.parsed_abilities.len(), 1);
    let ability = &ir.parsed_abilities[0];
    assert_eq!(ability.ability_type, AbilityType::Spell);
    assert_eq!(ability.effects.len(), 1);
    let effect = &ability.effects[0];
    assert_eq!(effect.action, EffectAction::DealDamage);
    assert_eq!(effect.target, TargetClass::AnyTarget);
    assert_eq!(effect.magnitude, Some(Amount::Fixed(3)));

    let burn_or_removal = ir
        .strategic_tags
        .hierarchical_tags
        .iter()
        .find(|tag| {
            tag.path == ["interaction", "removal"] || tag.path == ["interaction", "burn"]
        })
        .expect("interaction tag");
    assert!(burn_or_removal.confidence >= 0.8);

    assert!(ir.reward_hints.immediate_impact);
    assert_eq!(ir.reward_hints.card_advantage, 0);
}

#[test]
fn burn_spell_with_self_name_in_text_parses_the_same() {
    let ir = convert(
        &record(
            "Lightning Bolt",
            "Instant",
            1.0,
            "Lightning Bolt deals 3 damage to any target.",
        ),
        FormatLegality::default(),
    )
    .unwrap();
    let effect = &ir.parsed_abilities[0].effects[0];
    assert_eq!(effect.action, EffectAction::DealDamage);
    assert_eq!(effect.magnitude, Some(Amount::Fixed(3)));
}

#[test]
fn mana_rock_is_tagged_ramp() {
    let ir = convert(
        &record("Sol Ring", "Artifact", 1.0, "{T}: Add {C}{C}."),
        FormatLegality::default(),
    )
    .unwrap();

    assert_eq!(ir.parsed_abilities.len(), 1);
    let ability = &ir.parsed_abilities[0];
    assert!(matches!(
        ability.ability_type,
        AbilityType::Activated | AbilityType::Static
    ));
    assert_eq!(ability.effects[0].action, EffectAction::AddMana);

    let ramp = ir
        .strategic_tags
        .hierarchical_tags
        .iter()
        .find(|tag| tag.root() == "ramp")
        .expect("ramp tag");
    assert!(ramp.confidence >= 0.8);
    assert!(ir.strategic_tags.flattened_tags.contains("ramp"));
}

#[test]
fn bare_add_clause_is_still_a_mana_ability() {
    let ir = convert(
        &record("Sol Ring", "Artifact", 1.0, "Add {C}{C}."),
        FormatLegality::default(),
    )
    .unwrap();
    assert_eq!(ir.parsed_abilities.len(), 1);
    assert_eq!(ir.parsed_abilities[0].effects[0].action, EffectAction::AddMana);
    assert!(ir.strategic_tags.flattened_tags.contains("ramp"));
}

#[test]
fn empty_oracle_text_yields_empty_abilities_without_failure() {
    let ir = convert(
        &record("Grizzly Bears", "Creature — Bear", 2.0, ""),
        FormatLegality::default(),
    )
    .unwrap();
    assert!(ir.parsed_abilities.is_empty());
    // Tags, if any, come from metadata alone.
    for tag in &ir.strategic_tags.hierarchical_tags {
        assert!(!tag.path.is_empty());
    }
}

#[test]
fn draw_on_draw_trigger() {
    let ir = convert(
        &record(
            "Teferi's Ageless Insight",
            "Legendary Enchantment",
            4.0,
            "Whenever you draw a card, draw a card.",
        ),
        FormatLegality::default(),
    )
    .unwrap();

    assert_eq!(ir.parsed_abilities.len(), 1);
    let ability = &ir.parsed_abilities[0];
    assert_eq!(ability.ability_type, AbilityType::Triggered);
    let trigger = ability.trigger.as_ref().expect("trigger");
    assert_eq!(trigger.event, TriggerEvent::DrawCard);
    assert_eq!(ability.effects.len(), 1);
    assert_eq!(ability.effects[0].action, EffectAction::DrawCard);
    assert_eq!(ability.effects[0].magnitude, Some(Amount::Fixed(1)));
    assert_eq!(ir.reward_hints.card_advantage, 1);
}

#[test]
fn legality_passes_through_untouched() {
    let mut legality = FormatLegality::default();
    legality
        .formats
        .insert("commander".to_string(), "legal".to_string());
    legality.can_be_commander = true;

    let ir = convert(
        &record(
            "Krenko, Mob Boss",
            "Legendary Creature — Goblin Warrior",
            4.0,
            "{T}: Create X 1/1 red Goblin creature tokens, where X is the number of Goblins you control.",
        ),
        legality.clone(),
    )
    .unwrap();
    assert_eq!(ir.format_legality, legality);
}

#[test]
fn counterspell_is_tagged_counter() {
    let ir = convert(
        &record(
            "Counterspell",
            "Instant",
            2.0,
            "Counter target spell.",
        ),
        FormatLegality::default(),
    )
    .unwrap();
    let ability = &ir.parsed_abilities[0];
    assert_eq!(ability.effects[0].action, EffectAction::CounterSpell);
    assert_eq!(ability.effects[0].target, TargetClass::Spell);
    assert!(ir
        .strategic_tags
        .hierarchical_tags
        .iter()
        .any(|tag| tag.path == ["interaction", "counter"]));
    assert!(ir
        .strategic_tags
        .hierarchical_tags
        .iter()
        .any(|tag| tag.path == ["tempo", "low_cost_interaction"]));
}

#[test]
fn keyword_soup_parses_per_keyword() {
    let ir = convert(
        &record(
            "Akroma, Angel of Wrath",
            "Legendary Creature — Angel",
            8.0,
            "Flying, first strike, vigilance, trample, haste, protection from black and from red",
        ),
        FormatLegality::default(),
    )
    .unwrap();
    let keywords: Vec<&str> = ir
        .parsed_abilities
        .iter()
        .filter(|ability| ability.ability_type == AbilityType::Keyword)
        .map(|ability| ability.source_text.as_str())
        .collect();
    assert!(keywords.contains(&"Flying"));
    assert!(keywords.contains(&"trample"));
}

#[test]
fn multiline_card_preserves_ability_order() {
    let ir = convert(
        &record(
            "Busy Body",
            "Creature — Human Advisor",
            3.0,
            "Flying\nWhenever this creature attacks, draw a card.\n{1}{W}, {T}: Destroy target creature.",
        ),
        FormatLegality::default(),
    )
    .unwrap();
    let types: Vec<AbilityType> = ir
        .parsed_abilities
        .iter()
        .map(|ability| ability.ability_type)
        .collect();
    assert_eq!(
        types,
        vec![
            AbilityType::Keyword,
            AbilityType::Triggered,
            AbilityType::Activated
        ]
    );
}
