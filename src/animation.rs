use macroquad::logging::warn;

/// Frame rate used by clips that never specify one (single-frame poses).
const DEFAULT_FPS: f32 = 60.0;

#[derive(Clone, Debug)]
pub struct Clip {
    pub name: &'static str,
    pub frames: Vec<usize>,
    pub fps: f32,
    pub looped: bool,
}

impl Clip {
    pub fn new(name: &'static str, frames: &[usize], fps: f32, looped: bool) -> Self {
        Self {
            name,
            frames: frames.to_vec(),
            fps: fps.max(f32::EPSILON),
            looped,
        }
    }

    pub fn still(name: &'static str, frame: usize) -> Self {
        Self::new(name, &[frame], DEFAULT_FPS, false)
    }

    pub fn duration(&self) -> f32 {
        self.frames.len() as f32 / self.fps
    }
}

/// Plays one named clip at a time.
///
/// `play` is idempotent for the clip already running, so callers can ask for
/// the desired clip every tick without restarting it. Completion of a
/// non-looping clip is observed through `is_finished`.
#[derive(Clone, Debug, Default)]
pub struct Animator {
    clips: Vec<Clip>,
    current: Option<usize>,
    elapsed: f32,
}

impl Animator {
    pub fn new(clips: Vec<Clip>) -> Self {
        Self {
            clips,
            current: None,
            elapsed: 0.0,
        }
    }

    /// Starts `name` from its first frame unless it is already the current clip.
    /// Returns whether a new clip was started.
    pub fn play(&mut self, name: &str) -> bool {
        if self.current_name() == Some(name) {
            return false;
        }
        match self.clips.iter().position(|clip| clip.name == name) {
            Some(index) => {
                self.current = Some(index);
                self.elapsed = 0.0;
                true
            }
            None => {
                warn!("animation clip '{}' is not registered", name);
                false
            }
        }
    }

    pub fn update(&mut self, dt: f32) {
        if self.current.is_some() {
            self.elapsed += dt;
        }
    }

    pub fn current_name(&self) -> Option<&'static str> {
        self.current.map(|index| self.clips[index].name)
    }

    /// True once a non-looping clip has shown its last frame for its full duration.
    pub fn is_finished(&self) -> bool {
        match self.current {
            Some(index) => {
                let clip = &self.clips[index];
                !clip.looped && self.elapsed >= clip.duration()
            }
            None => false,
        }
    }

    /// Spritesheet frame to draw right now.
    pub fn frame(&self) -> usize {
        let Some(index) = self.current else {
            return 0;
        };
        let clip = &self.clips[index];
        if clip.frames.is_empty() {
            return 0;
        }
        let step = (self.elapsed * clip.fps) as usize;
        let step = if clip.looped {
            step % clip.frames.len()
        } else {
            step.min(clip.frames.len() - 1)
        };
        clip.frames[step]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animator() -> Animator {
        Animator::new(vec![
            Clip::new("run", &[1, 2], 8.0, true),
            Clip::new("die", &[5, 6, 5, 6], 12.0, false),
        ])
    }

    #[test]
    fn replaying_current_clip_is_a_no_op() {
        let mut anim = animator();
        assert!(anim.play("run"));
        anim.update(0.2);
        let frame = anim.frame();
        assert!(!anim.play("run"));
        assert_eq!(anim.frame(), frame);
    }

    #[test]
    fn looped_clip_wraps_and_never_finishes() {
        let mut anim = animator();
        anim.play("run");
        assert_eq!(anim.frame(), 1);
        anim.update(0.125);
        assert_eq!(anim.frame(), 2);
        anim.update(0.125);
        assert_eq!(anim.frame(), 1);
        anim.update(10.0);
        assert!(!anim.is_finished());
    }

    #[test]
    fn one_shot_clip_finishes_after_its_duration() {
        let mut anim = animator();
        anim.play("die");
        anim.update(0.3);
        assert!(!anim.is_finished());
        anim.update(0.05);
        assert!(anim.is_finished());
        assert_eq!(anim.frame(), 6);
    }

    #[test]
    fn switching_clip_restarts_timing() {
        let mut anim = animator();
        anim.play("die");
        anim.update(1.0);
        assert!(anim.is_finished());
        anim.play("run");
        assert!(!anim.is_finished());
        assert_eq!(anim.current_name(), Some("run"));
    }

    #[test]
    fn unknown_clip_keeps_current() {
        let mut anim = animator();
        anim.play("run");
        assert!(!anim.play("fly"));
        assert_eq!(anim.current_name(), Some("run"));
    }
}
