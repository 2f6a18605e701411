mod entry;

use probeburst::error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
