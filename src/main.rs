fn main() -> anyhow::Result<()> {
    lemur_review_lib::run()
}
