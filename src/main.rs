fn main() -> miette::Result<()> {
    kala::cli::run()
}
