// BEGIN(Parse) Define parse
pub fn parse(input: &str) -> Vec<u32> {
    // BEGIN(Parse) Split fields
    let fields = input.split(',');
    // BEGIN(Parse) Define parse
    fields.filter_map(|f| f.trim().parse().ok()).collect()
}
// END

// BEGIN Unused helper
fn helper() {}
// END
