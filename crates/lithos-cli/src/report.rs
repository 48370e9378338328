use glam::UVec3;
use lithos_config::Catalog;
use lithos_core::{CategoryId, VoxelState};
use lithos_world::{ChunkDebugInfo, Excavation};

/// Symbols assigned to categories in text maps, in legend order.
const SYMBOLS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const VOID_SYMBOL: char = '.';
const COVER_SYMBOL: char = '#';
const OVERFLOW_SYMBOL: char = '?';

/// Map symbol for a category given the legend it belongs to.
fn symbol(legend: &[CategoryId], id: CategoryId) -> char {
    legend
        .iter()
        .position(|&c| c == id)
        .map_or(VOID_SYMBOL, |i| {
            SYMBOLS.get(i).map_or(OVERFLOW_SYMBOL, |&b| b as char)
        })
}

/// Format a legend as a markdown table: symbol, name, formula and color.
pub fn format_legend(catalog: &Catalog, legend: &[CategoryId]) -> String {
    let mut out = String::new();
    out.push_str("| Symbol | Mineral | Formula | Color |\n");
    out.push_str("|--------|---------|---------|-------|\n");
    for &id in legend {
        let name = catalog.categories().name_or_void(id);
        let (formula, color) = catalog.mineral(id).map_or((String::new(), String::new()), |m| {
            let (r, g, b) = m.color;
            (m.formula.clone(), format!("#{r:02x}{g:02x}{b:02x}"))
        });
        out.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            symbol(legend, id),
            name,
            formula,
            color
        ));
    }
    out
}

/// Format chunk debug counts as a markdown table, largest first.
pub fn format_counts(info: &ChunkDebugInfo) -> String {
    let total: u64 = info.category_counts.values().sum();
    let mut counts: Vec<(&String, &u64)> = info.category_counts.iter().collect();
    counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let mut out = String::new();
    out.push_str("| Category | Cells | Share (%) |\n");
    out.push_str("|----------|-------|-----------|\n");
    for (name, &count) in counts {
        let share = if total == 0 {
            0.0
        } else {
            count as f64 / total as f64 * 100.0
        };
        out.push_str(&format!("| {name} | {count} | {share:.2} |\n"));
    }
    out
}

/// Render a `[y][x]` slice as text, one line per row, followed by its legend.
pub fn format_slice(catalog: &Catalog, rows: &[Vec<CategoryId>]) -> String {
    let mut legend: Vec<CategoryId> = rows
        .iter()
        .flatten()
        .copied()
        .filter(|&id| !catalog.categories().is_void(id))
        .collect();
    legend.sort_unstable();
    legend.dedup();

    let mut out = String::new();
    for row in rows {
        out.extend(row.iter().map(|&id| symbol(&legend, id)));
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&format_legend(catalog, &legend));
    out
}

/// One line per revealed voxel: name, formula and description when known.
pub fn format_reveal(catalog: &Catalog, id: CategoryId, pos: UVec3) -> String {
    let name = catalog.categories().name_or_void(id);
    let mut out = format!("revealed {name}");
    if let Some(mineral) = catalog.mineral(id) {
        if !mineral.formula.is_empty() {
            out.push_str(&format!(" ({})", mineral.formula));
        }
        out.push_str(&format!(" at {pos}"));
        if !mineral.description.is_empty() {
            out.push_str(&format!(": {}", mineral.description));
        }
    } else {
        out.push_str(&format!(" at {pos}"));
    }
    out.push('\n');
    out
}

/// Top-down view of an excavation at its frontier depth (or the bottom layer
/// once complete): `#` covered, `.` void, legend symbols for exposed cells.
pub fn format_excavation(catalog: &Catalog, excavation: &Excavation) -> String {
    let cover = excavation.cover();
    let size = cover.size();
    let depth = excavation.frontier().min(size.saturating_sub(1));
    let legend = excavation.material().used_categories(catalog.categories());

    let mut out = format!(
        "origin {} size {} crust {}\nfrontier {} of {}, {} covered voxels\n\n",
        excavation.key().origin,
        size,
        excavation.crust_class(),
        excavation.frontier(),
        size,
        cover.covered_count()
    );
    out.push_str(&format!("depth {depth}:\n"));
    for y in 0..size {
        for x in 0..size {
            let state = cover.column(x, y)[depth as usize];
            out.push(match state {
                VoxelState::Void => VOID_SYMBOL,
                VoxelState::Covered(_) => COVER_SYMBOL,
                VoxelState::Exposed(id) => symbol(&legend, id),
            });
        }
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&format_legend(catalog, &legend));
    out
}
