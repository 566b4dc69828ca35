pub struct Config {
    /// Suppresses decorative output.
    ///
    /// 0 = full output, 1 = no banner/headers, 2 = results only.
    pub quiet: u8,
}
