//! Built-in champion pool.

use crate::models::Role;
use crate::models::Role::{Adc, Jungle, Mid, Support, Top};

pub const STANDARD_POOL: &[(&str, &[Role])] = &[
    // Top
    ("Aatrox", &[Top]),
    ("Camille", &[Top]),
    ("Darius", &[Top]),
    ("Fiora", &[Top]),
    ("Gangplank", &[Top]),
    ("Garen", &[Top]),
    ("Gnar", &[Top]),
    ("Gwen", &[Top]),
    ("Illaoi", &[Top]),
    ("Irelia", &[Top]),
    ("Jax", &[Top]),
    ("Jayce", &[Top, Mid]),
    ("K'Sante", &[Top]),
    ("Kennen", &[Top]),
    ("Kled", &[Top]),
    ("Malphite", &[Top]),
    ("Mordekaiser", &[Top]),
    ("Nasus", &[Top]),
    ("Ornn", &[Top]),
    ("Renekton", &[Top]),
    ("Riven", &[Top]),
    ("Sett", &[Top]),
    ("Shen", &[Top]),
    ("Teemo", &[Top]),
    ("Urgot", &[Top]),
    // Jungle
    ("Amumu", &[Jungle]),
    ("Bel'Veth", &[Jungle]),
    ("Diana", &[Jungle, Mid]),
    ("Ekko", &[Jungle, Mid]),
    ("Elise", &[Jungle]),
    ("Evelynn", &[Jungle]),
    ("Graves", &[Jungle]),
    ("Hecarim", &[Jungle]),
    ("Jarvan IV", &[Jungle]),
    ("Karthus", &[Jungle, Mid]),
    ("Kayn", &[Jungle]),
    ("Kindred", &[Jungle]),
    ("Lee Sin", &[Jungle]),
    ("Master Yi", &[Jungle]),
    ("Nidalee", &[Jungle]),
    ("Nocturne", &[Jungle]),
    ("Nunu & Willump", &[Jungle]),
    ("Rammus", &[Jungle]),
    ("Rek'Sai", &[Jungle]),
    ("Sejuani", &[Jungle]),
    ("Shaco", &[Jungle]),
    ("Vi", &[Jungle]),
    ("Viego", &[Jungle]),
    ("Warwick", &[Jungle]),
    ("Xin Zhao", &[Jungle]),
    // Mid
    ("Ahri", &[Mid]),
    ("Akali", &[Mid, Top]),
    ("Anivia", &[Mid]),
    ("Annie", &[Mid]),
    ("Aurelion Sol", &[Mid]),
    ("Azir", &[Mid]),
    ("Cassiopeia", &[Mid]),
    ("Fizz", &[Mid]),
    ("Galio", &[Mid, Support]),
    ("Kassadin", &[Mid]),
    ("Katarina", &[Mid]),
    ("LeBlanc", &[Mid]),
    ("Lissandra", &[Mid]),
    ("Lux", &[Mid, Support]),
    ("Malzahar", &[Mid]),
    ("Orianna", &[Mid]),
    ("Ryze", &[Mid]),
    ("Sylas", &[Mid]),
    ("Syndra", &[Mid]),
    ("Twisted Fate", &[Mid]),
    ("Veigar", &[Mid]),
    ("Viktor", &[Mid]),
    ("Xerath", &[Mid]),
    ("Yasuo", &[Mid]),
    ("Zed", &[Mid]),
    // Bot
    ("Aphelios", &[Adc]),
    ("Ashe", &[Adc]),
    ("Caitlyn", &[Adc]),
    ("Draven", &[Adc]),
    ("Ezreal", &[Adc]),
    ("Jhin", &[Adc]),
    ("Jinx", &[Adc]),
    ("Kai'Sa", &[Adc]),
    ("Kalista", &[Adc]),
    ("Kog'Maw", &[Adc]),
    ("Lucian", &[Adc]),
    ("Miss Fortune", &[Adc]),
    ("Nilah", &[Adc]),
    ("Samira", &[Adc]),
    ("Senna", &[Adc, Support]),
    ("Sivir", &[Adc]),
    ("Tristana", &[Adc]),
    ("Twitch", &[Adc]),
    ("Varus", &[Adc]),
    ("Vayne", &[Adc]),
    ("Xayah", &[Adc]),
    ("Zeri", &[Adc]),
    // Support
    ("Alistar", &[Support]),
    ("Bard", &[Support]),
    ("Blitzcrank", &[Support]),
    ("Brand", &[Support, Mid]),
    ("Braum", &[Support]),
    ("Janna", &[Support]),
    ("Karma", &[Support]),
    ("Leona", &[Support]),
    ("Lulu", &[Support]),
    ("Morgana", &[Support, Mid]),
    ("Nami", &[Support]),
    ("Nautilus", &[Support]),
    ("Pyke", &[Support]),
    ("Rakan", &[Support]),
    ("Renata Glasc", &[Support]),
    ("Sona", &[Support]),
    ("Soraka", &[Support]),
    ("Tahm Kench", &[Support, Top]),
    ("Taric", &[Support]),
    ("Thresh", &[Support]),
    ("Yuumi", &[Support]),
    ("Zilean", &[Support, Mid]),
    ("Zyra", &[Support]),
];
