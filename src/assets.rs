//! Image assets and the loading barrier
//!
//! Every manifest entry either decodes or gets a generated placeholder; both
//! count toward the barrier, so a missing file never blocks the menu.
//! The simulation never touches images; only the renderer reads them.

use std::collections::HashMap;

use crate::error::AssetError;
use crate::palette::{self, Rgba};
use crate::sim::PowerupKind;

/// Sprite placeholder size
pub const PLACEHOLDER_SIZE: (u32, u32) = (50, 60);
/// Background placeholder size (whole arena)
pub const BACKGROUND_SIZE: (u32, u32) = (800, 600);

/// Named sprite images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    Warrior,
    Enemy,
    Treasure,
    Door,
    HealthPowerup,
    SpeedPowerup,
    InvincibilityPowerup,
}

impl Sprite {
    pub const ALL: [Sprite; 7] = [
        Sprite::Warrior,
        Sprite::Enemy,
        Sprite::Treasure,
        Sprite::Door,
        Sprite::HealthPowerup,
        Sprite::SpeedPowerup,
        Sprite::InvincibilityPowerup,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Sprite::Warrior => "warrior",
            Sprite::Enemy => "enemy",
            Sprite::Treasure => "treasure",
            Sprite::Door => "door",
            Sprite::HealthPowerup => "healthPowerup",
            Sprite::SpeedPowerup => "speedPowerup",
            Sprite::InvincibilityPowerup => "invincibilityPowerup",
        }
    }

    pub fn for_powerup(kind: PowerupKind) -> Self {
        match kind {
            PowerupKind::Health => Sprite::HealthPowerup,
            PowerupKind::Speed => Sprite::SpeedPowerup,
            PowerupKind::Invincibility => Sprite::InvincibilityPowerup,
        }
    }
}

/// Where a loaded image goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetSlot {
    Sprite(Sprite),
    /// Background for level `n` (0-based)
    Background(usize),
}

impl AssetSlot {
    /// Display name, also used to pick the placeholder colour
    pub fn name(&self) -> String {
        match self {
            AssetSlot::Sprite(s) => s.name().to_string(),
            AssetSlot::Background(i) => format!("background{}", i + 1),
        }
    }
}

/// Paths of every image the game wants
#[derive(Debug, Clone)]
pub struct AssetManifest {
    pub sprites: Vec<(Sprite, String)>,
    /// One per level, in level order
    pub backgrounds: Vec<String>,
}

impl Default for AssetManifest {
    fn default() -> Self {
        let dir = "assets/images";
        let sprites = vec![
            (Sprite::Warrior, format!("{dir}/warrior.png")),
            (Sprite::Enemy, format!("{dir}/enemy.png")),
            (Sprite::Treasure, format!("{dir}/treasure.svg")),
            (Sprite::Door, format!("{dir}/door.png")),
            (Sprite::HealthPowerup, format!("{dir}/health_powerup.png")),
            (Sprite::SpeedPowerup, format!("{dir}/speed_powerup.png")),
            (
                Sprite::InvincibilityPowerup,
                format!("{dir}/invincibility_powerup.png"),
            ),
        ];
        let backgrounds = (1..=5)
            .map(|i| format!("{dir}/background{i}.png"))
            .collect();
        Self {
            sprites,
            backgrounds,
        }
    }
}

impl AssetManifest {
    /// Every entry with its slot, sprites first
    pub fn entries(&self) -> Vec<(AssetSlot, String)> {
        self.sprites
            .iter()
            .map(|(s, p)| (AssetSlot::Sprite(*s), p.clone()))
            .chain(
                self.backgrounds
                    .iter()
                    .enumerate()
                    .map(|(i, p)| (AssetSlot::Background(i), p.clone())),
            )
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sprites.len() + self.backgrounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A decoded (or substituted) image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAsset {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Mean colour of the visible pixels; the placeholder fill for substitutes
    pub tint: Rgba,
    pub placeholder: bool,
}

/// Fill colour for a placeholder, chosen by what the name mentions
pub fn placeholder_color(name: &str) -> Rgba {
    let name = name.to_lowercase();
    let hex = if name.contains("background") {
        "#34495e"
    } else if name.contains("powerup") {
        "#9b59b6"
    } else if name.contains("door") {
        "#2ecc71"
    } else if name.contains("treasure") {
        "#f1c40f"
    } else if name.contains("enemy") {
        "#e74c3c"
    } else if name.contains("warrior") {
        "#3498db"
    } else {
        "#999999"
    };
    palette::hex(hex).unwrap_or(palette::WHITE)
}

/// Generated stand-in for an image that failed to load
pub fn placeholder(name: &str) -> ImageAsset {
    let (width, height) = if name.to_lowercase().contains("background") {
        BACKGROUND_SIZE
    } else {
        PLACEHOLDER_SIZE
    };
    ImageAsset {
        name: name.to_string(),
        width,
        height,
        tint: placeholder_color(name),
        placeholder: true,
    }
}

/// Decode PNG/JPEG/BMP bytes
pub fn decode_image(name: &str, bytes: &[u8]) -> Result<ImageAsset, AssetError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();

    let mut sum = [0.0f64; 3];
    let mut weight = 0.0f64;
    for px in rgba.pixels() {
        let a = px[3] as f64 / 255.0;
        if a <= 0.0 {
            continue;
        }
        for (c, s) in sum.iter_mut().enumerate() {
            *s += px[c] as f64 / 255.0 * a;
        }
        weight += a;
    }
    let tint = if weight > 0.0 {
        [
            (sum[0] / weight) as f32,
            (sum[1] / weight) as f32,
            (sum[2] / weight) as f32,
            1.0,
        ]
    } else {
        placeholder_color(name)
    };

    Ok(ImageAsset {
        name: name.to_string(),
        width: rgba.width(),
        height: rgba.height(),
        tint,
        placeholder: false,
    })
}

/// Loaded images plus barrier bookkeeping
#[derive(Debug, Clone, Default)]
pub struct Assets {
    sprites: HashMap<Sprite, ImageAsset>,
    backgrounds: Vec<Option<ImageAsset>>,
    loaded: usize,
    total: usize,
}

impl Assets {
    pub fn new(manifest: &AssetManifest) -> Self {
        Self {
            sprites: HashMap::new(),
            backgrounds: vec![None; manifest.backgrounds.len()],
            loaded: 0,
            total: manifest.len(),
        }
    }

    /// Store the outcome of one load; failures become placeholders.
    /// A slot outside the manifest is rejected and does not count.
    pub fn record(
        &mut self,
        slot: AssetSlot,
        path: &str,
        result: Result<ImageAsset, AssetError>,
    ) -> Result<(), AssetError> {
        if let AssetSlot::Background(i) = slot
            && i >= self.backgrounds.len()
        {
            return Err(AssetError::Unknown(path.to_string()));
        }

        let name = slot.name();
        let asset = match result {
            Ok(asset) => {
                log::debug!("Loaded {} ({}x{})", path, asset.width, asset.height);
                asset
            }
            Err(e) => {
                log::error!("Failed to load image {}: {}", path, e);
                placeholder(&name)
            }
        };

        match slot {
            AssetSlot::Sprite(sprite) => {
                self.sprites.insert(sprite, asset);
            }
            AssetSlot::Background(i) => self.backgrounds[i] = Some(asset),
        }
        self.loaded += 1;
        Ok(())
    }

    pub fn loaded(&self) -> usize {
        self.loaded
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Whole-percent progress, 100 when the manifest is empty
    pub fn progress_percent(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        (self.loaded.min(self.total) * 100 / self.total) as u32
    }

    pub fn is_complete(&self) -> bool {
        self.loaded >= self.total
    }

    pub fn sprite(&self, sprite: Sprite) -> Option<&ImageAsset> {
        self.sprites.get(&sprite)
    }

    pub fn background(&self, level: usize) -> Option<&ImageAsset> {
        self.backgrounds.get(level).and_then(|b| b.as_ref())
    }

    /// Sprite tint, falling back to its placeholder colour before it loads
    pub fn sprite_tint(&self, sprite: Sprite) -> Rgba {
        self.sprite(sprite)
            .map_or_else(|| placeholder_color(sprite.name()), |a| a.tint)
    }

    pub fn background_tint(&self, level: usize) -> Rgba {
        self.background(level)
            .map_or(palette::BACKGROUND, |a| a.tint)
    }
}

/// Load every manifest entry from disk relative to `root`
#[cfg(not(target_arch = "wasm32"))]
pub fn load_from_dir(manifest: &AssetManifest, root: &std::path::Path) -> Assets {
    let mut assets = Assets::new(manifest);
    for (slot, path) in manifest.entries() {
        let result = std::fs::read(root.join(&path))
            .map_err(AssetError::from)
            .and_then(|bytes| decode_image(&slot.name(), &bytes));
        if let Err(e) = assets.record(slot, &path, result) {
            log::warn!("{}", e);
        }
    }
    log::info!(
        "Assets loaded: {}/{} ({}%)",
        assets.loaded(),
        assets.total(),
        assets.progress_percent()
    );
    assets
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(color: [u8; 4]) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(4, 3, image::Rgba(color));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_manifest_has_sprites_and_backgrounds() {
        let manifest = AssetManifest::default();
        assert_eq!(manifest.len(), 12);
        let entries = manifest.entries();
        assert_eq!(entries[0].0, AssetSlot::Sprite(Sprite::Warrior));
        assert_eq!(entries[11].0, AssetSlot::Background(4));
        assert_eq!(entries[11].1, "assets/images/background5.png");
    }

    #[test]
    fn test_placeholder_colors() {
        assert_eq!(placeholder_color("warrior"), palette::hex("#3498db").unwrap());
        assert_eq!(placeholder_color("enemy"), palette::hex("#e74c3c").unwrap());
        assert_eq!(placeholder_color("treasure"), palette::hex("#f1c40f").unwrap());
        assert_eq!(placeholder_color("door"), palette::hex("#2ecc71").unwrap());
        assert_eq!(
            placeholder_color("speedPowerup"),
            palette::hex("#9b59b6").unwrap()
        );
        assert_eq!(
            placeholder_color("background3"),
            palette::hex("#34495e").unwrap()
        );
        assert_eq!(placeholder_color("mystery"), palette::hex("#999999").unwrap());
    }

    #[test]
    fn test_placeholder_sizes() {
        let sprite = placeholder("door");
        assert_eq!((sprite.width, sprite.height), PLACEHOLDER_SIZE);
        assert!(sprite.placeholder);
        let bg = placeholder("background1");
        assert_eq!((bg.width, bg.height), BACKGROUND_SIZE);
    }

    #[test]
    fn test_decode_computes_tint() {
        let asset = decode_image("enemy", &png_bytes([255, 0, 0, 255])).unwrap();
        assert_eq!((asset.width, asset.height), (4, 3));
        assert!(!asset.placeholder);
        assert!((asset.tint[0] - 1.0).abs() < 1e-6);
        assert!(asset.tint[1].abs() < 1e-6);
    }

    #[test]
    fn test_decode_transparent_uses_category_color() {
        let asset = decode_image("door", &png_bytes([0, 0, 0, 0])).unwrap();
        assert_eq!(asset.tint, placeholder_color("door"));
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(matches!(
            decode_image("door", b"<svg></svg>"),
            Err(AssetError::Decode(_))
        ));
    }

    #[test]
    fn test_failures_count_toward_barrier() {
        let manifest = AssetManifest::default();
        let mut assets = Assets::new(&manifest);
        assert_eq!(assets.progress_percent(), 0);

        let entries = manifest.entries();
        for (i, (slot, path)) in entries.iter().enumerate() {
            let result = if i % 2 == 0 {
                decode_image(&slot.name(), &png_bytes([10, 20, 30, 255]))
            } else {
                Err(AssetError::Fetch {
                    path: path.clone(),
                    reason: "404".into(),
                })
            };
            assets.record(*slot, path, result).unwrap();
            if i == 5 {
                assert_eq!(assets.progress_percent(), 50);
                assert!(!assets.is_complete());
            }
        }

        assert!(assets.is_complete());
        assert_eq!(assets.progress_percent(), 100);
        // Enemy is entry 1, so it failed and was substituted
        let enemy = assets.sprite(Sprite::Enemy).unwrap();
        assert!(enemy.placeholder);
        assert_eq!(enemy.name, "enemy");
        assert!(!assets.sprite(Sprite::Warrior).unwrap().placeholder);
        assert!(assets.background(4).is_some());
        assert!(assets.background(5).is_none());
    }

    #[test]
    fn test_slot_outside_manifest_is_rejected() {
        let mut assets = Assets::new(&AssetManifest::default());
        let path = "assets/images/background6.jpg";
        let result = assets.record(
            AssetSlot::Background(5),
            path,
            decode_image("background6", &png_bytes([1, 2, 3, 255])),
        );
        assert!(matches!(result, Err(AssetError::Unknown(p)) if p == path));
        assert_eq!(assets.loaded(), 0);
        assert!(assets.background(5).is_none());
    }

    #[test]
    fn test_tint_fallbacks_before_load() {
        let assets = Assets::new(&AssetManifest::default());
        assert_eq!(
            assets.sprite_tint(Sprite::Treasure),
            placeholder_color("treasure")
        );
        assert_eq!(assets.background_tint(0), palette::BACKGROUND);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_missing_directory_degrades_to_placeholders() {
        let manifest = AssetManifest::default();
        let assets = load_from_dir(&manifest, std::path::Path::new("/nonexistent/warrior-arena"));
        assert!(assets.is_complete());
        assert!(Sprite::ALL
            .iter()
            .all(|s| assets.sprite(*s).is_some_and(|a| a.placeholder)));
        assert!((0..5).all(|i| assets.background(i).is_some()));
    }
}
