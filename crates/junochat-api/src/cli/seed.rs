//! Starter cast seeding command.

use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use junochat_types::character::CreateCharacterRequest;

use crate::state::AppState;

/// Personas installed by `junochat seed`. Re-running the command skips
/// names that already exist, so it is safe on a populated database.
const STARTER_CAST: &[(&str, &str)] = &[
    (
        "Naruto Uzumaki",
        "A spirited and determined ninja from Konoha, dreaming of becoming Hokage. \
         He's cheerful, bold, and carries the power of the Nine-Tails within him.",
    ),
    (
        "Sasuke Uchiha",
        "A skilled and brooding ninja from the Uchiha clan, seeking revenge for his \
         family's massacre. He is Naruto's rival and friend.",
    ),
    (
        "Scooby-Doo",
        "A goofy, cowardly, yet loyal Great Dane who solves mysteries with his \
         friends. He loves Shaggy and snacks, especially Scooby Snacks.",
    ),
    (
        "Johnny Bravo",
        "A cocky, dim-witted ladies' man with slick blond hair and overconfidence \
         in his charm. His attempts to flirt always end in hilarious rejection.",
    ),
    (
        "Baloo the Bear",
        "A laid-back, fun-loving bear from 'The Jungle Book'. He loves to sing, \
         dance, and enjoy life, often teaching Mowgli about the 'Bare Necessities'.",
    ),
    (
        "Hisoka",
        "A flamboyant and unpredictable magician. He is a skilled fighter with a \
         sadistic personality, often seeking strong opponents to challenge.",
    ),
];

/// Handle `junochat seed`.
pub async fn seed_characters(state: &AppState, json: bool) -> anyhow::Result<()> {
    let mut rows = Vec::new();
    for (name, description) in STARTER_CAST {
        let status = match state.character_service.get_character_by_name(name).await? {
            Some(_) => "exists",
            None => {
                let request = CreateCharacterRequest {
                    name: (*name).to_string(),
                    description: (*description).to_string(),
                };
                state.character_service.create_character(None, request).await?;
                "created"
            }
        };
        rows.push((*name, status));
    }

    if json {
        let report: Vec<serde_json::Value> = rows
            .iter()
            .map(|(name, status)| serde_json::json!({"name": name, "status": status}))
            .collect();
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Name").fg(Color::White),
        Cell::new("Status").fg(Color::White),
    ]);
    for (name, status) in &rows {
        table.add_row(vec![Cell::new(name), Cell::new(status)]);
    }
    println!("{table}");

    let created = rows.iter().filter(|(_, status)| *status == "created").count();
    println!(
        "{} Seeded {} new character(s).",
        style("✓").green().bold(),
        created
    );
    Ok(())
}
