//! Parameter identifiers understood by the bundled cat models

pub const MOUSE_X: &str = "ParamMouseX";
pub const MOUSE_Y: &str = "ParamMouseY";
pub const ANGLE_X: &str = "ParamAngleX";
pub const ANGLE_Y: &str = "ParamAngleY";

/// Parameters driven by the cursor position
pub const MOUSE_TRACKING: [&str; 4] = [MOUSE_X, MOUSE_Y, ANGLE_X, ANGLE_Y];

pub const MOUSE_LEFT_DOWN: &str = "ParamMouseLeftDown";
pub const MOUSE_RIGHT_DOWN: &str = "ParamMouseRightDown";

pub const LEFT_HAND_DOWN: &str = "CatParamLeftHandDown";
pub const RIGHT_HAND_DOWN: &str = "CatParamRightHandDown";

pub const STICK_LX: &str = "CatParamStickLX";
pub const STICK_LY: &str = "CatParamStickLY";
pub const STICK_RX: &str = "CatParamStickRX";
pub const STICK_RY: &str = "CatParamStickRY";

pub const STICK_LEFT_DOWN: &str = "CatParamStickLeftDown";
pub const STICK_RIGHT_DOWN: &str = "CatParamStickRightDown";

pub const STICK_SHOW_LEFT_HAND: &str = "CatParamStickShowLeftHand";
pub const STICK_SHOW_RIGHT_HAND: &str = "CatParamStickShowRightHand";

/// Horizontal parameters are the ones mirrored
pub fn is_horizontal(id: &str) -> bool {
    id.ends_with('X')
}
