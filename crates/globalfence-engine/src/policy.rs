//! Permission table: which category of globals each runtime may reference
//!
//! The table is asymmetric. The embedded runtime may use server-only globals
//! but a server runtime may not use embedded-only ones; shared globals are
//! only off-limits when no environment is assumed.

use globalfence_core::{Category, Runtime};

/// Rows follow `Category::ALL`, columns follow `Runtime::ALL`
const PERMISSIONS: [[bool; 5]; 4] = [
    //  embedded  server  browser  mixed  none
    [true, false, false, false, false], // embedded-only
    [true, true, false, false, false],  // server-only
    [false, false, true, false, false], // browser-only
    [true, true, true, true, false],    // shared
];

fn row(category: Category) -> usize {
    match category {
        Category::EmbeddedOnly => 0,
        Category::ServerOnly => 1,
        Category::BrowserOnly => 2,
        Category::Shared => 3,
    }
}

fn column(runtime: Runtime) -> usize {
    match runtime {
        Runtime::Embedded => 0,
        Runtime::Server => 1,
        Runtime::Browser => 2,
        Runtime::Mixed => 3,
        Runtime::None => 4,
    }
}

/// Whether code declared for `runtime` may reference globals of `category`
pub fn is_permitted(category: Category, runtime: Runtime) -> bool {
    PERMISSIONS[row(category)][column(runtime)]
}

/// Categories forbidden in `runtime`, in canonical order
pub fn forbidden_categories(runtime: Runtime) -> impl Iterator<Item = Category> {
    Category::ALL
        .into_iter()
        .filter(move |category| !is_permitted(*category, runtime))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_may_use_server_globals() {
        assert!(is_permitted(Category::ServerOnly, Runtime::Embedded));
        assert!(!is_permitted(Category::EmbeddedOnly, Runtime::Server));
    }

    #[test]
    fn each_exclusive_category_is_allowed_in_its_own_runtime() {
        assert!(is_permitted(Category::EmbeddedOnly, Runtime::Embedded));
        assert!(is_permitted(Category::ServerOnly, Runtime::Server));
        assert!(is_permitted(Category::BrowserOnly, Runtime::Browser));
    }

    #[test]
    fn browser_globals_only_in_browser() {
        for runtime in Runtime::ALL {
            assert_eq!(
                is_permitted(Category::BrowserOnly, runtime),
                runtime == Runtime::Browser,
                "{runtime}"
            );
        }
    }

    #[test]
    fn shared_forbidden_only_without_environment() {
        for runtime in Runtime::ALL {
            assert_eq!(is_permitted(Category::Shared, runtime), runtime != Runtime::None);
        }
    }

    #[test]
    fn none_forbids_everything() {
        let forbidden: Vec<_> = forbidden_categories(Runtime::None).collect();
        assert_eq!(forbidden, Category::ALL.to_vec());
    }

    #[test]
    fn mixed_only_allows_shared() {
        let forbidden: Vec<_> = forbidden_categories(Runtime::Mixed).collect();
        assert_eq!(
            forbidden,
            vec![Category::EmbeddedOnly, Category::ServerOnly, Category::BrowserOnly]
        );
    }
}
