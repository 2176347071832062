use crate::cli::OutputFormat;
use crate::config::Context;
use crate::types::{ApiResponse, Pet, PetList, ResponseBody};
use console::style;
use serde::Serialize;
use tabled::{Table, Tabled};

#[derive(Debug, Tabled, Serialize)]
pub struct PetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "TYPE")]
    animal_type: String,
    #[tabled(rename = "AGE")]
    age: String,
    #[tabled(rename = "PHOTO")]
    photo: String,
}

impl From<&Pet> for PetRow {
    fn from(pet: &Pet) -> Self {
        Self {
            id: pet.id.clone(),
            name: pet.name.clone(),
            animal_type: pet.animal_type.clone(),
            age: pet.age.clone(),
            photo: if pet.has_photo() { "yes" } else { "" }.to_string(),
        }
    }
}

/// Render rows as a table, or a dim placeholder when there are none.
pub fn render_table<T: Tabled>(data: Vec<T>) -> String {
    if data.is_empty() {
        return style("No pets found").dim().to_string();
    }
    Table::new(data).to_string()
}

/// Render any serializable value in the given non-table format.
pub fn render<T: Serialize>(format: OutputFormat, data: &T) -> anyhow::Result<String> {
    Ok(match format {
        // Single values have no table shape
        OutputFormat::Table | OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?.trim_end().to_string(),
    })
}

/// Print a pet list based on format preference
pub fn print_pets(ctx: &Context, pets: &PetList) -> anyhow::Result<()> {
    match ctx.output_format() {
        OutputFormat::Table => {
            let rows: Vec<PetRow> = pets.pets.iter().map(PetRow::from).collect();
            println!("{}", render_table(rows));
        }
        format => println!("{}", render(format, pets)?),
    }
    Ok(())
}

/// Print a response body: pretty JSON/YAML when it parsed, raw text otherwise.
pub fn print_body(ctx: &Context, body: &ResponseBody) -> anyhow::Result<()> {
    match body {
        ResponseBody::Json(value) => println!("{}", render(ctx.output_format(), value)?),
        ResponseBody::Text(text) if text.is_empty() => {}
        ResponseBody::Text(text) => println!("{}", text),
    }
    Ok(())
}

/// Report the status line of a response on stderr.
pub fn print_status(response: &ApiResponse) {
    let msg = format!("HTTP {}", response.status);
    if response.is_success() {
        print_success(&msg);
    } else {
        print_error(&msg);
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    eprintln!("{} {}", style("✓").green().bold(), msg);
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("✗").red().bold(), msg);
}
