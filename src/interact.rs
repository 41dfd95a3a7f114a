//! Interaction resolution: the shared cooldown discipline, player melee
//! and quest dialogue, NPC melee, and item pickup.

use tracing::{debug, info};

use crate::audio::{AudioContext, SoundConfig};
use crate::character::{Npc, NpcKind};
use crate::collision::collides;
use crate::item::{self, Item};
use crate::player::{Player, QuestProgress};

/// Most-negative value any cooldown counter may reach. The overshoot past
/// zero makes the refractory period strictly longer than the armed value.
pub const COOLDOWN_FLOOR: i32 = -10;
/// Player interact/attack re-arm value, in ticks.
pub const INTERACT_COOLDOWN: i32 = 30;
/// NPC melee re-arm value.
pub const NPC_ATTACK_COOLDOWN: i32 = 60;
/// NPC path recompute re-arm value.
pub const PATH_REFRESH_COOLDOWN: i32 = 30;

/// A cooldown is ready once its counter has counted below zero.
pub fn cooldown_ready(counter: i32) -> bool {
    counter < 0
}

/// Count a cooldown down by one tick, clamped at the floor.
pub fn cooldown_tick(counter: &mut i32) {
    if *counter > COOLDOWN_FLOOR {
        *counter -= 1;
    }
}

/// Resolve one player interact attempt against every NPC on the current
/// map. A target is hit when its body overlaps the player's body or the
/// player's reach rectangle. Enemies take damage (and may die, dropping
/// into `world_items`); the quest giver advances the quest instead.
///
/// The caller gates on the player's cooldown; this resolves a single swing.
pub fn player_interact(
    player: &mut Player,
    npcs: &mut [Npc],
    world_items: &mut Vec<Item>,
    current_map: usize,
    audio: &mut AudioContext,
) {
    let body = player.character.bounds();
    let reach = player.reach_rect();

    for npc in npcs.iter_mut() {
        let target = &mut npc.character;
        if !target.alive || target.map != current_map {
            continue;
        }
        let target_box = target.bounds();
        if !collides(target_box, body) && !collides(target_box, reach) {
            continue;
        }

        match npc.kind {
            NpcKind::Enemy => {
                target.hp = (target.hp - player.character.power).max(0);
                debug!(name = %target.name, hp = target.hp, "enemy hit");
                if target.hp == 0 {
                    target.die(world_items, audio);
                }
            }
            NpcKind::QuestGiver => advance_quest(player, audio),
        }
    }
}

/// Quest dialogue: NotTalked → Talked plays the dialogue cue; Talked →
/// ReturnedItem requires a carried Book, consumes it, and raises the
/// player's attack power; ReturnedItem is terminal.
fn advance_quest(player: &mut Player, audio: &mut AudioContext) {
    match player.quest {
        QuestProgress::NotTalked => {
            player.quest = QuestProgress::Talked;
            info!("quest started");
            audio.play("dialogue", SoundConfig::default());
        }
        QuestProgress::Talked => {
            // Without the Book the state stays Talked.
            if let Some(index) = player.character.item_index(item::BOOK) {
                player.character.remove_at(index);
                player.character.power += 1;
                player.quest = QuestProgress::ReturnedItem;
                info!(power = player.character.power, "quest completed");
                audio.play("quest_reward", SoundConfig::default());
            }
        }
        QuestProgress::ReturnedItem => {}
    }
}

/// Enemy melee: body overlap only, no reach rectangle. Each enemy fires
/// when overlapping the player with its cooldown ready, then re-arms;
/// otherwise its cooldown counts down.
pub fn npc_attacks(
    player: &mut Player,
    npcs: &mut [Npc],
    world_items: &mut Vec<Item>,
    current_map: usize,
    audio: &mut AudioContext,
) {
    let target = &mut player.character;
    for npc in npcs.iter_mut() {
        if npc.kind != NpcKind::Enemy {
            continue;
        }
        let attacker = &mut npc.character;
        if !attacker.alive || attacker.map != current_map {
            continue;
        }

        let in_contact =
            target.alive && collides(attacker.bounds(), target.bounds());
        if in_contact && cooldown_ready(attacker.attack_cooldown) {
            target.hp = (target.hp - attacker.power).max(0);
            attacker.attack_cooldown = NPC_ATTACK_COOLDOWN;
            debug!(hp = target.hp, "player hit");
            if target.hp == 0 {
                target.die(world_items, audio);
            }
        } else {
            cooldown_tick(&mut attacker.attack_cooldown);
        }
    }
}

/// Move every item on the current map that overlaps the player's body
/// into the inventory. Non-healing pickups fire the pickup cue; Hearts
/// stay silent until converted on a later tick.
pub fn pick_up_items(
    player: &mut Player,
    items: &mut Vec<Item>,
    current_map: usize,
    audio: &mut AudioContext,
) {
    if !player.character.alive {
        return;
    }
    let body = player.character.bounds();
    let mut kept = Vec::with_capacity(items.len());
    for item in items.drain(..) {
        if item.map == current_map && collides(item.bounds(), body) {
            debug!(name = %item.name, "item picked up");
            if item.name != item::HEART {
                audio.play("pickup", SoundConfig::default());
            }
            player.character.inventory.push(item);
        } else {
            kept.push(item);
        }
    }
    *items = kept;
}

// ── Tests ────────────────────────────────────────────────────────────────────
