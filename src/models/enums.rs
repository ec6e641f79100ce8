use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Macro to generate a status enum with as_str + std::str::FromStr pattern.
/// The string is also the serde wire value. Values the backend adds later
/// land in `Other` and are sent back unchanged.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $s,)+
                    Self::Other(s) => s,
                }
            }

            pub fn is_known(&self) -> bool {
                !matches!(self, Self::Other(_))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                match s {
                    $($s => Self::$variant,)+
                    other => Self::Other(other.to_string()),
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self::from(s))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Ok(Self::from(raw.as_str()))
            }
        }
    };
}

/// Sentinel written to the backend once a webhook request was sent.
pub const REQUESTED_STATUS: &str = "SOLICITADO";

str_enum!(SchedulingStatus {
    Scheduled => "AGENDADO",
    Confirmed => "CONFIRMADO",
    Requested => "SOLICITADO",
    Released => "LIBERADO",
    Completed => "REALIZADO",
    NoShow => "FALTOU",
    Cancelled => "CANCELADO",
});

str_enum!(ReceivableStatus {
    Pending => "PENDENTE",
    Requested => "SOLICITADO",
    Paid => "PAGO",
    Overdue => "VENCIDO",
    Cancelled => "CANCELADO",
});
