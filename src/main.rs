fn main() -> anyhow::Result<()> {
    disposition_board_lib::run()
}
