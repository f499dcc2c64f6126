use anyhow::Result;

fn main() -> Result<()> {
    thoughts_cli::main_entry()
}
