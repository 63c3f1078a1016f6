pub use pretty::DocAllocator;
pub use pretty::termcolor;
pub use pretty::termcolor::Color;
pub use pretty::termcolor::ColorChoice;
pub use pretty::termcolor::ColorSpec;
pub use pretty::termcolor::StandardStream;
pub use pretty::termcolor::WriteColor;

mod render;
pub mod theme;
pub mod tokens;
pub mod types;
pub mod util;

pub use types::*;

pub const DEFAULT_WIDTH: usize = 100;

/// Print a slice of printable items, separated by commas
pub fn print_comma_separated<'a, T: Print>(
    items: &'a [T],
    cfg: &PrintCfg,
    alloc: &'a Alloc<'a>,
) -> Builder<'a> {
    if items.is_empty() {
        alloc.nil()
    } else {
        let sep = alloc.text(tokens::COMMA).append(alloc.space());
        alloc.intersperse(items.iter().map(|item| item.print(cfg, alloc)), sep)
    }
}
