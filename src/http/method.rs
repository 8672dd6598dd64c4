/// HTTP Method.
///
/// This API follows the [RFC9110] and the PATCH method from [RFC5789].
///
/// Arbitrary method is not supported.
///
/// [RFC5789]: https://www.rfc-editor.org/rfc/rfc5789
/// [RFC9110]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-methods>
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Method(u8);

struct Props {
    safe: bool,
    idem: bool,
    value: &'static [u8],
}

props! {
    static PROPS: [9];

    /// The [GET] method requests transfer of a current selected representation for the target
    /// resource.
    ///
    /// [GET]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-get>
    pub const GET = (0, b"GET", safe, idem);
    /// The [HEAD] method is identical to GET except that the server MUST NOT send content in the
    /// response.
    ///
    /// [HEAD]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-head>
    pub const HEAD = (1, b"HEAD", safe, idem);
    /// The [POST] method requests that the target resource process the representation enclosed in
    /// the request.
    ///
    /// [POST]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-post>
    pub const POST = (2, b"POST", , );
    /// The [PUT] method requests that the state of the target resource be created or replaced.
    ///
    /// [PUT]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-put>
    pub const PUT = (3, b"PUT", , idem);
    /// The [DELETE] method requests that the origin server remove the association between the
    /// target resource and its current functionality.
    ///
    /// [DELETE]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-delete>
    pub const DELETE = (4, b"DELETE", , idem);
    /// The [CONNECT] method requests that the recipient establish a tunnel.
    ///
    /// [CONNECT]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-connect>
    pub const CONNECT = (5, b"CONNECT", , );
    /// The [OPTIONS] method requests information about the communication options available for the
    /// target resource.
    ///
    /// [OPTIONS]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-options>
    pub const OPTIONS = (6, b"OPTIONS", safe, idem);
    /// The [TRACE] method requests a remote, application-level loop-back of the request message.
    ///
    /// [TRACE]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-trace>
    pub const TRACE = (7, b"TRACE", safe, idem);
    /// The [PATCH] method requests that a set of changes be applied to the resource.
    ///
    /// [PATCH]: <https://www.rfc-editor.org/rfc/rfc5789#section-2>
    pub const PATCH = (8, b"PATCH", , );
}

impl Method {
    /// Returns `true` if method is considered ["safe"].
    ///
    /// ["safe"]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-safe-methods>
    #[inline]
    pub const fn is_safe(&self) -> bool {
        PROPS[self.0 as usize].safe
    }

    /// Returns `true` if method is considered ["idempotent"].
    ///
    /// ["idempotent"]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-idempotent-methods>
    #[inline]
    pub const fn is_idempotent(&self) -> bool {
        PROPS[self.0 as usize].idem
    }

    /// Returns string representation of the method.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        // SAFETY: all method values are ASCII literals
        unsafe { std::str::from_utf8_unchecked(PROPS[self.0 as usize].value) }
    }

    /// Returns the dense index of the method, in `0..Method::COUNT`.
    #[inline]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl std::str::FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes()).ok_or(UnknownMethod)
    }
}

impl std::fmt::Debug for Method {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        str::fmt(self.as_str(), f)
    }
}

impl std::fmt::Display for Method {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        str::fmt(self.as_str(), f)
    }
}

// ===== Set =====

/// A set of [`Method`]s.
///
/// Iteration yields methods in declaration order.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MethodSet(u16);

impl MethodSet {
    /// Empty set.
    pub const EMPTY: Self = Self(0);

    /// Set of every supported method.
    pub const ALL: Self = Self((1 << Method::COUNT) - 1);

    /// Returns `true` if set contains no method.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if set contains `method`.
    #[inline]
    pub const fn contains(&self, method: Method) -> bool {
        self.0 & (1 << method.0) != 0
    }

    /// Returns new set with `method` included.
    #[inline]
    pub const fn with(self, method: Method) -> Self {
        Self(self.0 | (1 << method.0))
    }

    /// Include `method` into the set.
    #[inline]
    pub fn insert(&mut self, method: Method) {
        self.0 |= 1 << method.0;
    }

    /// Returns an iterator over the methods in the set.
    pub fn iter(&self) -> impl Iterator<Item = Method> + use<> {
        let bits = self.0;
        (0..Method::COUNT as u8)
            .filter(move |i| bits & (1 << *i) != 0)
            .map(Method)
    }
}

impl From<Method> for MethodSet {
    fn from(method: Method) -> Self {
        Self::EMPTY.with(method)
    }
}

impl FromIterator<Method> for MethodSet {
    fn from_iter<T: IntoIterator<Item = Method>>(iter: T) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

/// Formatted as the `Allow` header value, e.g: `GET, HEAD`.
impl std::fmt::Display for MethodSet {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (i, method) in self.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            f.write_str(method.as_str())?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for MethodSet {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

// ===== Error =====

/// Method is not one of the supported methods.
#[derive(Debug, thiserror::Error)]
#[error("unknown method")]
pub struct UnknownMethod;

// ===== Macros =====

macro_rules! props {
    (
        static $props:ident: [$len:literal];
        $(
           $(#[$doc:meta])*
           pub const $name:ident = ($idx:literal, $val:literal, $($safe:ident)?, $($idem:ident)?);
        )*
    ) => {
        impl Method {
            $(
               $(#[$doc])*
               pub const $name: Self = Self($idx);
            )*

            /// Number of supported methods.
            pub const COUNT: usize = $len;

            /// Create [`Method`] from bytes.
            #[inline]
            pub const fn from_bytes(src: &[u8]) -> Option<Method> {
                match src {
                    $(
                        $val => Some(Self::$name),
                    )*
                    _ => None,
                }
            }
        }

        static $props: [Props; $len] = [
            $(
                Props { value: $val, safe: prop!($($safe)?), idem: prop!($($idem)?) },
            )*
        ];
    };
}

macro_rules! prop {
    (safe) => { true };
    (idem) => { true };
    () => { false };
}

use {props, prop};

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn method_props() {
        assert_eq!(Method::from_bytes(b"PATCH"), Some(Method::PATCH));
        assert_eq!(Method::from_bytes(b"get"), None);
        assert!(Method::PUT.is_idempotent());
        assert!(!Method::PUT.is_safe());
        assert!(!Method::POST.is_idempotent());
    }

    #[test]
    fn method_set() {
        let set = MethodSet::from_iter([Method::POST, Method::GET]);
        assert!(set.contains(Method::GET));
        assert!(!set.contains(Method::PUT));
        assert_eq!(set.to_string(), "GET, POST");
        assert_eq!(MethodSet::ALL.iter().count(), Method::COUNT);
    }
}
