fn main() -> anyhow::Result<()> {
    lookism_lib::run()
}
