//! Validation of connection parameters entered on the command line or in
//! the settings file.

use crate::error::ValidationError;

/// Port used when the address has none.
pub const DEFAULT_PORT: u16 = 3000;
pub const MAX_NAME_LEN: usize = 32;
/// Rooms longer than this are refused by the server.
pub const MAX_ROOM_LEN: usize = 50;

/// Validates a server address (host:port format)
pub fn validate_server_address(addr: &str) -> Result<(String, u16), ValidationError> {
    if addr.is_empty() {
        return Err(ValidationError::EmptyServer);
    }

    let parts: Vec<&str> = addr.split(':').collect();

    match parts.as_slice() {
        [host] => {
            if host.is_empty() {
                return Err(ValidationError::EmptyHost);
            }
            Ok((host.to_string(), DEFAULT_PORT))
        }
        [host, port] => {
            if host.is_empty() {
                return Err(ValidationError::EmptyHost);
            }

            let port_num = port
                .parse::<u16>()
                .map_err(|_| ValidationError::InvalidPort(port.to_string()))?;
            if port_num == 0 {
                return Err(ValidationError::InvalidPort(port.to_string()));
            }

            Ok((host.to_string(), port_num))
        }
        _ => Err(ValidationError::MalformedAddress),
    }
}

/// The name other members see. Surrounding whitespace is dropped.
pub fn validate_display_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong { max: MAX_NAME_LEN });
    }
    Ok(name.to_string())
}

/// Room names are trimmed and capped at [`MAX_ROOM_LEN`] characters.
pub fn validate_room_name(room: &str) -> Result<String, ValidationError> {
    let room = room.trim();
    if room.is_empty() {
        return Err(ValidationError::EmptyRoom);
    }
    if room.chars().count() > MAX_ROOM_LEN {
        return Err(ValidationError::RoomTooLong { max: MAX_ROOM_LEN });
    }
    Ok(room.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_server_address() {
        assert_eq!(
            validate_server_address("chat.example.com:8443").unwrap(),
            ("chat.example.com".to_string(), 8443)
        );
        assert_eq!(
            validate_server_address("localhost").unwrap(),
            ("localhost".to_string(), DEFAULT_PORT)
        );

        assert_eq!(validate_server_address(""), Err(ValidationError::EmptyServer));
        assert_eq!(validate_server_address(":3000"), Err(ValidationError::EmptyHost));
        assert_eq!(
            validate_server_address("host:abc"),
            Err(ValidationError::InvalidPort("abc".into()))
        );
        assert!(validate_server_address("host:0").is_err());
        assert_eq!(
            validate_server_address("a:1:2"),
            Err(ValidationError::MalformedAddress)
        );
    }

    #[test]
    fn test_validate_display_name() {
        assert_eq!(validate_display_name("  Ann ").unwrap(), "Ann");
        assert_eq!(validate_display_name("   "), Err(ValidationError::EmptyName));
        assert!(validate_display_name(&"n".repeat(MAX_NAME_LEN)).is_ok());
        assert!(validate_display_name(&"n".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_room_name() {
        assert_eq!(validate_room_name(" lobby ").unwrap(), "lobby");
        assert_eq!(validate_room_name(""), Err(ValidationError::EmptyRoom));
        assert!(validate_room_name(&"r".repeat(50)).is_ok());
        assert_eq!(
            validate_room_name(&"r".repeat(51)),
            Err(ValidationError::RoomTooLong { max: 50 })
        );
    }
}
