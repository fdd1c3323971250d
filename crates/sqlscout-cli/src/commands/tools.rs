pub fn run() {
    for tool in sqlscout_mcp::tools::list_tools() {
        println!("{}", tool.name);
        println!("  {}", tool.description);
    }
}
