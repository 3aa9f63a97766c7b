//! Build a small catalog in code and print the best set for a caster build.
//!
//! Run with: cargo run -p charm-core --example basic

use charm_core::{search, weights_from, Ability, Charm, EvalConfig, Rarity};

fn main() {
    let charms = vec![
        Charm::new("Ember Heart", 3)
            .with(Ability::MagicDamage, 6.0)
            .with(Ability::MaxHealth, -2.0)
            .with_rarity(Rarity::Rare),
        Charm::new("Quickened Mind", 2)
            .with(Ability::AbilityCooldown, -8.0)
            .with_rarity(Rarity::Uncommon),
        Charm::new("Stone Skin", 2).with(Ability::Armor, 2.0),
        Charm::new("Frost Lens", 4)
            .with(Ability::MagicDamage, 9.0)
            .with(Ability::CriticalChance, 3.0)
            .with_rarity(Rarity::Epic),
        Charm::new("Swift Boots", 1).with(Ability::Speed, 4.0),
    ];

    let weights = weights_from(&[
        (Ability::MagicDamage, 3),
        (Ability::AbilityCooldown, 2),
        (Ability::CriticalChance, 1),
        (Ability::MaxHealth, 1),
    ]);

    let result = search(
        &EvalConfig {
            charms: &charms,
            max_power: 8,
            weights,
            threads: 2,
        },
        None,
    );

    println!("utility: {}", result.utility);
    for &id in &result.charms {
        let charm = &charms[id as usize];
        println!("  {} ({}) [{}]", charm.name, charm.power, charm.rarity);
    }
    println!("power used: {}/8", result.power_used(&charms));
}
